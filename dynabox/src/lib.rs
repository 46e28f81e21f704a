//! # dynabox - Compile-Time Return Value Boxing
//!
//! `dynabox` turns the statically typed return value of a native function
//! into a uniform [`Dynamic`] value that a dynamic dispatch engine can pass
//! around. The boxing strategy is selected from the return type at compile
//! time; there is no runtime type inspection and no runtime failure path in
//! the selector.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dynabox::prelude::*;
//!
//! // Trivially copyable values are owned by the dynamic value.
//! let five = 5_i32.into_dynamic();
//! assert_eq!(five.cast::<i32>()?, 5);
//!
//! // References alias the referent without keeping it alive.
//! let greeting = Slot::new(String::from("hi"));
//! let view = greeting.by_ref().into_dynamic();
//! greeting.set("bye".into());
//! assert_eq!(view.cast::<String>()?, "bye");
//!
//! // Closures come back as callables.
//! let add = Function::new(|a: i32, b: i32| a + b).into_dynamic();
//! let sum = add.call(&[1_i32.into_dynamic(), 2_i32.into_dynamic()])?;
//! ```
//!
//! ## Handles
//!
//! Whether a function returns a copy, a shared handle, a reference or a
//! pointer is stated by its return type:
//!
//! - [`Slot<T>`] - shared ownership
//! - [`Ref<T>`] / [`RefMut<T>`] - non-owning references
//! - [`Ptr<T>`] / [`ConstPtr<T>`] - nullable non-owning pointers
//!
//! ## Feature Flags
//!
//! - `macros` (default) - `#[derive(Dynamic)]`
//! - `tracing` - log every boxing decision and slot reassignment
//! - `legacy-pointer-mutability` - box `ConstPtr` values as mutable

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use dynabox_core::{
    // Dynamic values
    AccessMode,
    // Numbers
    Arithmetic,
    // Errors
    CastError,
    // Handles
    ConstPtr,
    DispatchError,
    Dynamic,
    Error,
    // Extraction
    FromArgs,
    FromDynamic,
    // Callables
    FunctionHandle,
    Number,
    NumberError,
    ProxyFunction,
    Ptr,
    Ref,
    RefMut,
    Slot,
    // Type identity
    TypeFlags,
    TypeInfo,
};

pub use dynabox_std::{
    AssignableFunction, Boxable, Function, FunctionAdapter, IntoDynamic, IntoFunction, Strategy,
    box_return,
};

/// Strategy selection and boxing helpers.
///
/// Generated code from `#[derive(Dynamic)]` calls into this module.
pub mod strategy {
    pub use dynabox_std::strategy::{
        Boxable, IntoDynamic, Strategy, box_function, box_return, box_trivial, box_value,
    };
}

/// Testing utilities.
pub mod testing {
    pub use dynabox_std::testing::{CountingFunction, RecordingFunction};
}

/// Prelude module - common imports for dynabox.
///
/// # Usage
///
/// ```rust,ignore
/// use dynabox::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AccessMode, Dynamic, FromDynamic, Function, IntoDynamic, Number, ProxyFunction, Ref,
        RefMut, Slot,
    };
}

#[cfg(feature = "macros")]
pub use dynabox_macros::Dynamic;
