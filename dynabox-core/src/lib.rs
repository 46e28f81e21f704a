//! # dynabox-core
//!
//! Core types for the dynabox return boxing layer.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! dispatch engines that consume boxed values without needing the boxing
//! strategies in `dynabox-std`.
//!
//! # Contents
//!
//! ## Dynamic values ([`Dynamic`])
//!
//! The uniform, type-erased value. Its payload is owned, shared, referenced
//! or absent, and it carries an [`AccessMode`] and a [`TypeInfo`].
//!
//! ## Slots and handles ([`Slot`], [`Ref`], [`RefMut`], [`Ptr`], [`ConstPtr`])
//!
//! Reference-counted cells and the non-owning handles into them. These are
//! how a native function states that it returns a shared handle, a reference
//! or a pointer rather than a value.
//!
//! ## Callables ([`ProxyFunction`])
//!
//! The interface a dispatch engine invokes functions through. Boxed
//! callables are [`FunctionHandle`]s inside a [`Dynamic`].
//!
//! ## Extraction ([`FromDynamic`], [`FromArgs`])
//!
//! Converts boxed arguments back into static parameter types.
//!
//! # Error Types
//!
//! - [`Error`] - Top-level error type
//! - [`CastError`] - Payload access errors
//! - [`DispatchError`] - Invocation errors
//! - [`NumberError`] - Arithmetic errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod dynamic;
mod error;
mod extract;
mod function;
mod number;
mod slot;
mod type_info;

// Re-exports
pub use dynamic::{AccessMode, Dynamic};
pub use error::{CastError, DispatchError, Error, NumberError};
pub use extract::{FromArgs, FromDynamic};
pub use function::{FunctionHandle, ProxyFunction};
pub use number::{Arithmetic, Number};
pub use slot::{ConstPtr, Ptr, Ref, RefMut, Slot};
pub use type_info::{TypeFlags, TypeInfo};
