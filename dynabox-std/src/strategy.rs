//! # Return Handling Strategy Selector
//!
//! Maps the static return type of a native function to one of twelve boxing
//! strategies. Selection is pure trait resolution: every supported return
//! type has an [`IntoDynamic`] implementation, and a type without one is a
//! compile error rather than a runtime failure.
//!
//! | Return type                                   | Strategy                      | Result                 |
//! |-----------------------------------------------|-------------------------------|------------------------|
//! | numeric primitives, `bool`, `char`            | [`Strategy::Trivial`]         | owned, mutable         |
//! | `String`, collections, `Option<T>`            | [`Strategy::NonTrivial`]      | shared, single owner   |
//! | `Function`, `&Function`, `Ref<Function>`      | [`Strategy::Callable`]        | owned callable         |
//! | `RefMut<Function>`                            | [`Strategy::CallableMutRef`]  | assignable, no keep-alive |
//! | `Slot<Function>` and references to it         | [`Strategy::SharedCallable`]  | assignable, keep-alive |
//! | `Ptr<T>`, `ConstPtr<T>`                       | [`Strategy::Pointer`]         | reference              |
//! | `Slot<T>` and references to it                | [`Strategy::SharedHandle`]    | shared                 |
//! | `Ref<T>`                                      | [`Strategy::ConstRef`]        | reference, read-only   |
//! | `RefMut<T>`                                   | [`Strategy::MutRef`]          | reference, mutable     |
//! | `Dynamic` and references to it                | [`Strategy::Passthrough`]     | unchanged              |
//! | `Number`, `&Number`                           | [`Strategy::Number`]          | underlying value       |
//! | `()`                                          | [`Strategy::Void`]            | void                   |
//!
//! Handle types dispatch on their element type through [`Boxable`], which
//! is how a slot holding a [`Function`](crate::Function) ends up with a
//! callable strategy instead of a plain shared handle.

use dynabox_core::{AccessMode, DispatchError, Dynamic, FunctionHandle, Ref, RefMut, Slot};
use std::any::Any;
use std::fmt;

/// The closed set of boxing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Moved into an owned payload.
    Trivial,
    /// Moved into a fresh slot, boxed as shared.
    NonTrivial,
    /// Wrapped in a polymorphic callable adapter.
    Callable,
    /// Wrapped in an assignable adapter bound to a slot it does not own.
    CallableMutRef,
    /// Wrapped in an assignable adapter that also keeps its slot alive.
    SharedCallable,
    /// Boxed as a non-owning pointer.
    Pointer,
    /// Boxed as shared, joining the existing owners.
    SharedHandle,
    /// Boxed as a read-only non-owning reference.
    ConstRef,
    /// Boxed as a mutable non-owning reference.
    MutRef,
    /// Already dynamic; returned unchanged.
    Passthrough,
    /// Numeric wrapper; unwrapped.
    Number,
    /// No value.
    Void,
}

impl Strategy {
    /// A short, stable name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Trivial => "trivial",
            Strategy::NonTrivial => "non_trivial",
            Strategy::Callable => "callable",
            Strategy::CallableMutRef => "callable_mut_ref",
            Strategy::SharedCallable => "shared_callable",
            Strategy::Pointer => "pointer",
            Strategy::SharedHandle => "shared_handle",
            Strategy::ConstRef => "const_ref",
            Strategy::MutRef => "mut_ref",
            Strategy::Passthrough => "passthrough",
            Strategy::Number => "number",
            Strategy::Void => "void",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion of a native return value into a [`Dynamic`].
///
/// # Default Implementations
///
/// - numeric primitives, `bool`, `char` → owned
/// - `String`, `Vec<T>`, maps, sets, `Option<T>` → shared, in a new slot
/// - `()` → void
/// - `Dynamic` → as is
/// - `Number` → the wrapped value
/// - [`Slot`], [`Ref`], [`RefMut`], `Ptr`, `ConstPtr` → per [`Boxable`]
///
/// User types get an implementation from `#[derive(Dynamic)]`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no return boxing strategy",
    label = "cannot be returned through dynamic dispatch",
    note = "Derive `Dynamic` for your own types, or return it inside a `Slot`, `Ref` or `RefMut`."
)]
pub trait IntoDynamic {
    /// The strategy this type is boxed with.
    const STRATEGY: Strategy;

    /// Box the value.
    fn into_dynamic(self) -> Dynamic;
}

/// Element types that can sit behind a [`Slot`] or reference handle.
///
/// The default methods give the generic handle behavior. Callables
/// override them so that handles to a function stay invocable.
pub trait Boxable: Send + Sync + Sized + 'static {
    /// Strategy for `Slot<Self>` and references to it.
    const SLOT_STRATEGY: Strategy = Strategy::SharedHandle;
    /// Strategy for `Ref<Self>`.
    const REF_STRATEGY: Strategy = Strategy::ConstRef;
    /// Strategy for `RefMut<Self>`.
    const REF_MUT_STRATEGY: Strategy = Strategy::MutRef;

    /// Box a shared handle.
    fn box_slot(slot: Slot<Self>) -> Dynamic {
        Dynamic::from_shared(slot, AccessMode::ReadWrite)
    }

    /// Box an immutable reference.
    fn box_ref(target: Ref<Self>) -> Dynamic {
        Dynamic::from_ref(target.into_weak(), AccessMode::ReadOnly)
    }

    /// Box a mutable reference.
    fn box_ref_mut(target: RefMut<Self>) -> Dynamic {
        Dynamic::from_ref(target.into_weak(), AccessMode::ReadWrite)
    }
}

/// Box a trivially copyable value as an owned payload.
pub fn box_trivial<T>(value: T) -> Dynamic
where
    T: Any + Copy + Send + Sync,
{
    trace_boxing::<T>(Strategy::Trivial);
    Dynamic::from_owned(value, AccessMode::ReadWrite)
}

/// Box a non-trivial value by moving it into a new slot.
pub fn box_value<T>(value: T) -> Dynamic
where
    T: Send + Sync + 'static,
{
    trace_boxing::<T>(Strategy::NonTrivial);
    Dynamic::from_shared(Slot::new(value), AccessMode::ReadWrite)
}

/// Box a callable handle.
pub fn box_function(function: FunctionHandle) -> Dynamic {
    Dynamic::from_owned(function, AccessMode::ReadWrite)
}

/// Box the return value of a native call.
///
/// Equivalent to `value.into_dynamic()`; useful where a function pointer is
/// expected.
pub fn box_return<T: IntoDynamic>(value: T) -> Dynamic {
    value.into_dynamic()
}

/// Records which strategy boxed a value of type `T`.
#[inline]
pub(crate) fn trace_boxing<T: ?Sized>(strategy: Strategy) {
    #[cfg(feature = "tracing")]
    {
        tracing::trace!(
            strategy = %strategy,
            ty = std::any::type_name::<T>(),
            "boxing return value"
        );
    }

    #[cfg(not(feature = "tracing"))]
    {
        let _ = strategy; // Suppress unused warnings
    }
}

/// Records a call that failed before reaching the closure.
#[inline]
pub(crate) fn trace_rejected<F: ?Sized>(error: &DispatchError) {
    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            callable = std::any::type_name::<F>(),
            error = %error,
            "rejected call"
        );
    }

    #[cfg(not(feature = "tracing"))]
    {
        let _ = error; // Suppress unused warnings
    }
}
