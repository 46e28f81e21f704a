//! Typed closure values.
//!
//! [`Function<A, R>`] is a cheaply clonable closure taking its parameters as
//! the tuple `A` and returning `R`. It is what native functions return when
//! they hand a callable back to the dispatch engine.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `Function::new(|a: i32, b: i32| a + b)`
//! 2. **Function item**: `Function::new(double)`, for any `fn` with up to
//!    eight parameters
//! 3. **Tuple form**: `Function::from_fn(|(a, b): (i32, i32)| a + b)`

use std::fmt;
use std::sync::Arc;

/// A shared closure with parameters `A` (a tuple) and return type `R`.
pub struct Function<A, R> {
    inner: Arc<dyn Fn(A) -> R + Send + Sync>,
}

impl<A: 'static, R: 'static> Function<A, R> {
    /// Build from any closure or function with up to eight parameters.
    pub fn new<F>(f: F) -> Self
    where
        F: IntoFunction<A, R>,
    {
        f.into_function()
    }

    /// Build from a closure taking the whole parameter tuple.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }
}

impl<A, R> Function<A, R> {
    /// Invoke the closure natively.
    pub fn call(&self, args: A) -> R {
        (self.inner)(args)
    }

    /// Whether both values share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, R> Clone for Function<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for Function<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &std::any::type_name::<A>())
            .field("returns", &std::any::type_name::<R>())
            .finish()
    }
}

/// Conversion of a closure into a [`Function`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into a `Function<{A}, {R}>`",
    label = "not a closure with matching parameters",
    note = "Closures must be `Fn + Send + Sync + 'static` and take at most eight parameters."
)]
pub trait IntoFunction<A, R> {
    /// Wrap the closure.
    fn into_function(self) -> Function<A, R>;
}

/// Macro to implement IntoFunction for closures of each arity.
macro_rules! impl_into_function {
    ($($T:ident),*) => {
        impl<F, R, $($T,)*> IntoFunction<($($T,)*), R> for F
        where
            F: Fn($($T),*) -> R + Send + Sync + 'static,
            R: 'static,
            $($T: 'static,)*
        {
            #[allow(non_snake_case)]
            fn into_function(self) -> Function<($($T,)*), R> {
                Function::from_fn(move |($($T,)*): ($($T,)*)| (self)($($T),*))
            }
        }
    };
}

impl_into_function!();
impl_into_function!(A1);
impl_into_function!(A1, A2);
impl_into_function!(A1, A2, A3);
impl_into_function!(A1, A2, A3, A4);
impl_into_function!(A1, A2, A3, A4, A5);
impl_into_function!(A1, A2, A3, A4, A5, A6);
impl_into_function!(A1, A2, A3, A4, A5, A6, A7);
impl_into_function!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use super::*;

    fn double(x: i64) -> i64 {
        x * 2
    }

    #[test]
    fn test_closure_arities() {
        let zero = Function::new(|| 1_u8);
        let two = Function::new(|a: i32, b: i32| a - b);

        assert_eq!(zero.call(()), 1);
        assert_eq!(two.call((5, 3)), 2);
        assert_eq!(Function::new(double).call((21,)), 42);
    }

    #[test]
    fn test_clone_shares_closure() {
        let f = Function::from_fn(|(s,): (String,)| s.len());
        let g = f.clone();

        assert!(f.ptr_eq(&g));
        assert!(!f.ptr_eq(&Function::from_fn(|(s,): (String,)| s.len())));
        assert_eq!(g.call(("four".into(),)), 4);
    }
}
