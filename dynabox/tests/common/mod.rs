#![allow(dead_code)]

use dynabox::{AccessMode, Boxable, Dynamic, Function, Slot};
use lazy_static::lazy_static;

// ============================================================================
// Argument Helpers
// ============================================================================

pub fn int(value: i32) -> Dynamic {
    Dynamic::from_owned(value, AccessMode::ReadWrite)
}

pub fn text(value: &str) -> Dynamic {
    Dynamic::from_owned(value.to_string(), AccessMode::ReadWrite)
}

pub fn call_int(callable: &Dynamic, args: &[Dynamic]) -> i32 {
    callable
        .call(args)
        .expect("call should succeed")
        .cast::<i32>()
        .expect("call should return i32")
}

// ============================================================================
// Test Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub name: String,
    pub score: i64,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 0,
        }
    }
}

// Handles to a player box with the generic handle strategies.
impl Boxable for Player {}

// ============================================================================
// Process-Wide Fixtures
// ============================================================================

pub type Handler = Function<(i32,), i32>;

lazy_static! {
    /// A callback slot shared by the whole test binary.
    pub static ref ON_SCORE: Slot<Handler> = Slot::new(Function::new(|x: i32| x));
}
