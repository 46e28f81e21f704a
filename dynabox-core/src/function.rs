//! # Callable Interface
//!
//! The contract a dispatch engine uses to invoke functions polymorphically.
//! Natively registered functions and callables produced by boxing a return
//! value both implement [`ProxyFunction`], so a function returned from a call
//! can be invoked again through the same dispatch path.
//!
//! A boxed callable is an owned [`Dynamic`] holding a [`FunctionHandle`];
//! [`Dynamic::call`] unwraps and invokes it.

use crate::dynamic::Dynamic;
use crate::error::{CastError, DispatchError};
use crate::type_info::TypeInfo;
use std::any::Any;
use std::sync::Arc;

/// A shared, type-erased callable.
pub type FunctionHandle = Arc<dyn ProxyFunction>;

/// A function invocable through dynamic dispatch.
///
/// Implementations must be thread-safe: handles are shared freely between
/// dispatch threads.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be invoked through dynamic dispatch",
    label = "missing `ProxyFunction` implementation",
    note = "Wrap closures with `FunctionAdapter` or `AssignableFunction` instead of implementing this by hand."
)]
pub trait ProxyFunction: Send + Sync + 'static {
    /// Number of parameters the function accepts.
    fn arity(&self) -> usize;

    /// The return type followed by each parameter type.
    fn param_types(&self) -> &[TypeInfo];

    /// Invoke with already-boxed arguments.
    fn call(&self, args: &[Dynamic]) -> Result<Dynamic, DispatchError>;

    /// Replace the function this callable dispatches to.
    ///
    /// Only callables bound to a mutable slot support this.
    fn assign(&self, other: &FunctionHandle) -> Result<(), DispatchError> {
        let _ = other;
        Err(DispatchError::NotAssignable {
            source_type: std::any::type_name::<Self>(),
        })
    }

    /// Upcast for recovering the concrete adapter behind a handle.
    fn as_any(&self) -> &dyn Any;

    /// The declared return type.
    fn return_type(&self) -> Option<TypeInfo> {
        self.param_types().first().copied()
    }
}

impl Dynamic {
    /// Recover the callable held by this value.
    pub fn as_function(&self) -> Result<FunctionHandle, CastError> {
        self.cast::<FunctionHandle>()
    }

    /// Whether this value holds a callable.
    pub fn is_function(&self) -> bool {
        self.is_type::<FunctionHandle>()
    }

    /// Invoke the callable held by this value.
    pub fn call(&self, args: &[Dynamic]) -> Result<Dynamic, DispatchError> {
        let function = self
            .as_function()
            .map_err(|_| DispatchError::NotCallable {
                type_name: self.type_info().name(),
            })?;
        function.call(args)
    }
}
