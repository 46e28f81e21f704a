//! Error types for dynabox.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`Error`] - Top-level error type for all dynabox operations
//! - [`CastError`] - Errors reading or writing a [`Dynamic`]
//! - [`DispatchError`] - Errors invoking a boxed callable
//! - [`NumberError`] - Errors from [`Number`] arithmetic
//!
//! Boxing itself never fails at runtime: a return type without a boxing
//! strategy is rejected by the compiler. Everything here belongs to what
//! happens *after* a value has been boxed.
//!
//! [`Dynamic`]: crate::Dynamic
//! [`Number`]: crate::Number

use thiserror::Error;

/// Top-level error type for all dynabox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a dynamic value failed.
    #[error("cast error: {0}")]
    Cast(#[from] CastError),

    /// Invoking a boxed callable failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Numeric arithmetic failed.
    #[error("number error: {0}")]
    Number(#[from] NumberError),
}

/// Errors that can occur while accessing the payload of a dynamic value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    /// The value carries no payload.
    #[error("cannot access the payload of a void value")]
    Void,

    /// The payload is of a different type than requested.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        /// The requested type.
        expected: &'static str,
        /// The type the value was boxed with.
        found: &'static str,
    },

    /// A write was attempted through a read-only value.
    #[error("value of type `{type_name}` is read-only")]
    ReadOnly {
        /// The type the value was boxed with.
        type_name: &'static str,
    },

    /// The referent of a non-owning reference has been dropped.
    #[error("reference to `{type_name}` outlived its referent")]
    Dangling {
        /// The type the value was boxed with.
        type_name: &'static str,
    },

    /// A shared handle was requested from a value that does not own its payload jointly.
    #[error("value of type `{type_name}` is not held by a shared handle")]
    NotShared {
        /// The type the value was boxed with.
        type_name: &'static str,
    },

    /// A numeric view was requested from a non-arithmetic value.
    #[error("`{type_name}` is not an arithmetic type")]
    NotArithmetic {
        /// The type the value was boxed with.
        type_name: &'static str,
    },
}

/// Errors that can occur when invoking a boxed callable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The number of arguments does not match the callable's arity.
    #[error("arity mismatch: expected {expected} arguments, got {found}")]
    ArityMismatch {
        /// Declared arity.
        expected: usize,
        /// Number of arguments supplied.
        found: usize,
    },

    /// An argument could not be converted to the declared parameter type.
    #[error("argument {index} could not be converted")]
    BadArgument {
        /// Zero-based position of the argument.
        index: usize,
        /// The underlying conversion failure.
        #[source]
        source: CastError,
    },

    /// The value being invoked does not hold a callable.
    #[error("value of type `{type_name}` is not callable")]
    NotCallable {
        /// The type the value was boxed with.
        type_name: &'static str,
    },

    /// The callable cannot take over the given function.
    #[error("callable cannot be assigned from `{source_type}`")]
    NotAssignable {
        /// Type name of the rejected callable.
        source_type: &'static str,
    },

    /// The slot an assignable callable is bound to has been dropped.
    #[error("callable slot has been dropped")]
    Dangling,
}

/// Errors that can occur during [`Number`](crate::Number) arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    /// An operand could not be read as a number.
    #[error(transparent)]
    Cast(#[from] CastError),

    /// Integer arithmetic overflowed, or a value does not fit in `i64`.
    #[error("integer overflow")]
    Overflow,

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
}
