//! # Polymorphic Callable Adapter
//!
//! Makes a [`Function`] invocable through dynamic dispatch. Returning a
//! closure from a native function boxes it through this adapter, so the
//! result is a first-class value the dispatch engine can call like any
//! registered function.

use crate::function::Function;
use crate::strategy::{IntoDynamic, Strategy, box_function, trace_boxing, trace_rejected};
use dynabox_core::{DispatchError, Dynamic, FromArgs, FunctionHandle, ProxyFunction, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// A [`ProxyFunction`] around a copy of a closure.
pub struct FunctionAdapter<A, R> {
    function: Function<A, R>,
    types: Vec<TypeInfo>,
}

impl<A, R> FunctionAdapter<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    /// Wrap a closure.
    pub fn new(function: Function<A, R>) -> Self {
        let mut types = Vec::with_capacity(A::ARITY + 1);
        types.push(TypeInfo::of::<R>());
        types.extend(A::param_types());
        Self { function, types }
    }

    /// Convert into a shareable handle.
    pub fn into_handle(self) -> FunctionHandle {
        Arc::new(self)
    }
}

impl<A, R> FunctionAdapter<A, R> {
    /// The wrapped closure.
    pub fn function(&self) -> &Function<A, R> {
        &self.function
    }
}

impl<A, R> ProxyFunction for FunctionAdapter<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    fn arity(&self) -> usize {
        A::ARITY
    }

    fn param_types(&self) -> &[TypeInfo] {
        &self.types
    }

    fn call(&self, args: &[Dynamic]) -> Result<Dynamic, DispatchError> {
        let args = A::from_args(args).inspect_err(trace_rejected::<Self>)?;
        Ok(self.function.call(args).into_dynamic())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<A, R> IntoDynamic for Function<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    const STRATEGY: Strategy = Strategy::Callable;

    fn into_dynamic(self) -> Dynamic {
        trace_boxing::<Self>(Strategy::Callable);
        box_function(FunctionAdapter::new(self).into_handle())
    }
}

impl<A, R> IntoDynamic for &Function<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    const STRATEGY: Strategy = Strategy::Callable;

    fn into_dynamic(self) -> Dynamic {
        self.clone().into_dynamic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynabox_core::AccessMode;

    fn int(v: i32) -> Dynamic {
        Dynamic::from_owned(v, AccessMode::ReadWrite)
    }

    #[test]
    fn test_invocation_matches_direct_call() {
        let add = Function::new(|a: i32, b: i32| a + b);
        let boxed = (&add).into_dynamic();

        let result = boxed.call(&[int(2), int(3)]).unwrap();
        assert_eq!(result.cast::<i32>(), Ok(add.call((2, 3))));
    }

    #[test]
    fn test_signature() {
        let adapter = FunctionAdapter::new(Function::new(|s: String, n: usize| s.len() + n));
        assert_eq!(adapter.arity(), 2);
        assert_eq!(
            adapter.param_types(),
            &[
                TypeInfo::of::<usize>(),
                TypeInfo::of::<String>(),
                TypeInfo::of::<usize>()
            ]
        );
        assert_eq!(adapter.return_type(), Some(TypeInfo::of::<usize>()));
    }

    #[test]
    fn test_wrong_argument_count() {
        let boxed = Function::new(|a: i32| a).into_dynamic();
        assert_eq!(
            boxed.call(&[]).unwrap_err(),
            DispatchError::ArityMismatch {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn test_result_is_boxed_by_strategy() {
        let boxed = Function::new(|| String::from("made")).into_dynamic();
        let result = boxed.call(&[]).unwrap();
        assert!(result.is_shared());

        let unit = Function::new(|_: i32| ()).into_dynamic();
        assert!(unit.call(&[int(0)]).unwrap().is_void());
    }

    #[test]
    fn test_returned_closure_is_callable_again() {
        let make_adder = Function::new(|n: i32| Function::new(move |x: i32| x + n));
        let adder = make_adder.into_dynamic().call(&[int(10)]).unwrap();

        assert!(adder.is_function());
        assert_eq!(adder.call(&[int(5)]).unwrap().cast::<i32>(), Ok(15));
    }
}
