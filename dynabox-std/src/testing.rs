//! Testing utilities for dynabox.
//!
//! This module provides callables that make testing dispatch paths easier.
//!
//! # Features
//!
//! - [`RecordingFunction`]: A callable that records every call it receives
//! - [`CountingFunction`]: A callable that counts invocations

use crate::function::Function;
use dynabox_core::{AccessMode, DispatchError, Dynamic, FunctionHandle, ProxyFunction, TypeInfo};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Function
// ============================================================================

/// A callable that records the arguments of every call.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingFunction::new(2);
/// let handle = recorder.clone().into_handle();
///
/// handle.call(&[1_i32.into_dynamic(), 2_i32.into_dynamic()])?;
///
/// assert_eq!(recorder.arg_counts(), vec![2]);
/// ```
#[derive(Clone)]
pub struct RecordingFunction {
    calls: Arc<Mutex<Vec<Vec<TypeInfo>>>>,
    result: Dynamic,
    types: Vec<TypeInfo>,
}

impl RecordingFunction {
    /// Create a recorder that accepts `arity` arguments of any type and
    /// returns void.
    pub fn new(arity: usize) -> Self {
        Self::with_result(arity, Dynamic::void())
    }

    /// Create a recorder that returns a specific value.
    pub fn with_result(arity: usize, result: Dynamic) -> Self {
        let mut types = Vec::with_capacity(arity + 1);
        types.push(result.type_info());
        types.extend(std::iter::repeat_n(TypeInfo::of::<Dynamic>(), arity));
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            result,
            types,
        }
    }

    /// Convert into a shareable handle.
    pub fn into_handle(self) -> FunctionHandle {
        Arc::new(self)
    }

    /// The argument types of every recorded call.
    pub fn calls(&self) -> Vec<Vec<TypeInfo>> {
        self.calls.lock().clone()
    }

    /// The argument count of every recorded call.
    pub fn arg_counts(&self) -> Vec<usize> {
        self.calls.lock().iter().map(Vec::len).collect()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl ProxyFunction for RecordingFunction {
    fn arity(&self) -> usize {
        self.types.len() - 1
    }

    fn param_types(&self) -> &[TypeInfo] {
        &self.types
    }

    fn call(&self, args: &[Dynamic]) -> Result<Dynamic, DispatchError> {
        self.calls
            .lock()
            .push(args.iter().map(Dynamic::type_info).collect());

        if args.len() != self.arity() {
            return Err(DispatchError::ArityMismatch {
                expected: self.arity(),
                found: args.len(),
            });
        }
        Ok(self.result.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Counting Function
// ============================================================================

/// A callable that counts invocations.
///
/// Calls return the running count as a `usize`.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingFunction::new();
/// let slot = Slot::new(counter.function());
///
/// slot.by_mut().into_dynamic().call(&[])?;
///
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone)]
pub struct CountingFunction {
    count: Arc<AtomicUsize>,
    types: Vec<TypeInfo>,
}

impl CountingFunction {
    /// Create a new counting function.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            types: vec![TypeInfo::of::<usize>()],
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }

    /// A typed closure sharing this counter.
    pub fn function(&self) -> Function<(), usize> {
        let count = Arc::clone(&self.count);
        Function::from_fn(move |()| count.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Convert into a shareable handle.
    pub fn into_handle(self) -> FunctionHandle {
        Arc::new(self)
    }
}

impl Default for CountingFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyFunction for CountingFunction {
    fn arity(&self) -> usize {
        0
    }

    fn param_types(&self) -> &[TypeInfo] {
        &self.types
    }

    fn call(&self, args: &[Dynamic]) -> Result<Dynamic, DispatchError> {
        if !args.is_empty() {
            return Err(DispatchError::ArityMismatch {
                expected: 0,
                found: args.len(),
            });
        }
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Dynamic::from_owned(count, AccessMode::ReadWrite))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
