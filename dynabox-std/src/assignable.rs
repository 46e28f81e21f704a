//! # Assignable Callable Adapter
//!
//! A [`ProxyFunction`] bound to a slot holding a [`Function`]. Every call
//! dispatches to whatever closure currently occupies the slot, so
//! reassigning the slot after boxing changes what later calls run.
//!
//! ```rust,ignore
//! let handler = Slot::new(Function::new(|x: i32| x + 1));
//! let boxed = handler.by_mut().into_dynamic();
//!
//! handler.set(Function::new(|x: i32| x * 10));
//! assert_eq!(boxed.call(&[2_i32.into_dynamic()])?.cast::<i32>()?, 20);
//! ```

use crate::adapter::FunctionAdapter;
use crate::function::Function;
use crate::strategy::{Boxable, IntoDynamic, Strategy, box_function, trace_rejected};
use dynabox_core::{
    AccessMode, CastError, DispatchError, Dynamic, FromArgs, FromDynamic, FunctionHandle,
    ProxyFunction, Ref, RefMut, Slot, TypeInfo,
};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::{Arc, Weak};

/// A callable that follows the contents of a function slot.
pub struct AssignableFunction<A, R> {
    target: RefMut<Function<A, R>>,
    keep_alive: Option<Slot<Function<A, R>>>,
    types: Vec<TypeInfo>,
}

impl<A, R> AssignableFunction<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    /// Bind to a slot without keeping it alive.
    pub fn new(target: RefMut<Function<A, R>>) -> Self {
        let mut types = Vec::with_capacity(A::ARITY + 1);
        types.push(TypeInfo::of::<R>());
        types.extend(A::param_types());
        Self {
            target,
            keep_alive: None,
            types,
        }
    }

    /// Bind to a slot and hold a strong handle to it.
    pub fn with_keep_alive(slot: Slot<Function<A, R>>) -> Self {
        let mut adapter = Self::new(slot.by_mut());
        adapter.keep_alive = Some(slot);
        adapter
    }

    /// Convert into a shareable handle.
    pub fn into_handle(self) -> FunctionHandle {
        Arc::new(self)
    }
}

impl<A, R> AssignableFunction<A, R> {
    /// The closure currently in the slot.
    ///
    /// The slot lock is released before this returns, so the closure may
    /// reassign its own slot when called.
    pub fn current(&self) -> Result<Function<A, R>, DispatchError> {
        self.target
            .read(Function::clone)
            .ok_or(DispatchError::Dangling)
    }

    /// Replace the closure in the slot.
    pub fn set(&self, function: Function<A, R>) -> Result<(), DispatchError> {
        self.target
            .write(|current| *current = function)
            .ok_or(DispatchError::Dangling)?;

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                params = std::any::type_name::<A>(),
                returns = std::any::type_name::<R>(),
                "reassigned function slot"
            );
        }

        Ok(())
    }

    /// Whether this adapter holds its slot alive.
    pub fn keeps_alive(&self) -> bool {
        self.keep_alive.is_some()
    }
}

impl<A, R> ProxyFunction for AssignableFunction<A, R>
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
        let function = self.current().inspect_err(trace_rejected::<Self>)?;
        let args = A::from_args(args).inspect_err(trace_rejected::<Self>)?;
        Ok(function.call(args).into_dynamic())
    }

    fn assign(&self, other: &FunctionHandle) -> Result<(), DispatchError> {
        let other = other.as_any();
        let function = if let Some(adapter) = other.downcast_ref::<FunctionAdapter<A, R>>() {
            adapter.function().clone()
        } else if let Some(adapter) = other.downcast_ref::<AssignableFunction<A, R>>() {
            adapter.current()?
        } else {
            return Err(DispatchError::NotAssignable {
                source_type: "callable with a different signature",
            });
        };
        self.set(function)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Handles to a closure stay callable once boxed.
impl<A, R> Boxable for Function<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    const SLOT_STRATEGY: Strategy = Strategy::SharedCallable;
    const REF_STRATEGY: Strategy = Strategy::Callable;
    const REF_MUT_STRATEGY: Strategy = Strategy::CallableMutRef;

    fn box_slot(slot: Slot<Self>) -> Dynamic {
        box_function(AssignableFunction::with_keep_alive(slot).into_handle())
    }

    /// A live closure is snapshotted into a callable. A dangling one boxes
    /// as a null reference typed as a callable handle, like the live case.
    fn box_ref(target: Ref<Self>) -> Dynamic {
        match target.read(Function::clone) {
            Some(function) => box_function(FunctionAdapter::new(function).into_handle()),
            None => {
                let null = Weak::<RwLock<FunctionHandle>>::new();
                Dynamic::from_ref(null, AccessMode::ReadOnly)
            }
        }
    }

    fn box_ref_mut(target: RefMut<Self>) -> Dynamic {
        box_function(AssignableFunction::new(target).into_handle())
    }
}

/// Callables taken as parameters.
///
/// Only callables boxed from a `Function` with the same signature convert
/// back; anything else is a type mismatch.
impl<A, R> FromDynamic for Function<A, R>
where
    A: FromArgs,
    R: IntoDynamic + 'static,
{
    fn from_dynamic(value: &Dynamic) -> Result<Self, CastError> {
        let found = value.type_info().name();
        let handle = value.as_function()?;
        let other = handle.as_any();

        if let Some(adapter) = other.downcast_ref::<FunctionAdapter<A, R>>() {
            return Ok(adapter.function().clone());
        }
        if let Some(adapter) = other.downcast_ref::<AssignableFunction<A, R>>() {
            return adapter
                .current()
                .map_err(|_| CastError::Dangling { type_name: found });
        }
        Err(CastError::TypeMismatch {
            expected: std::any::type_name::<Self>(),
            found,
        })
    }
}
