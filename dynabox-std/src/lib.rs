//! # dynabox-std
//!
//! Return boxing strategies and callable adapters for dynabox.
//!
//! This crate provides:
//! - **Strategy selection**: [`IntoDynamic`], [`Boxable`], [`Strategy`]
//! - **Typed closures**: [`Function`], [`IntoFunction`]
//! - **Callable adapters**: [`FunctionAdapter`], [`AssignableFunction`]
//! - **Boxing of standard types**: primitives, containers, handles, pointers
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use dynabox_core;

// Modules
mod adapter;
mod assignable;
mod function;
mod handles;
pub mod strategy;
pub mod testing;
mod values;

pub use adapter::FunctionAdapter;
pub use assignable::AssignableFunction;
pub use function::{Function, IntoFunction};
pub use strategy::{Boxable, IntoDynamic, Strategy, box_return};
