//! Collision and generation failures, and the process-wide handlers that
//! decide what happens on each.
//!
//! The handlers are plain function values held in process-wide registries.
//! Reads and exchanges are atomic with respect to each other: a read racing
//! an exchange observes the old handler or the new one, never a torn value,
//! and the last exchange wins.

use std::sync::RwLock;
use thiserror::Error;

/// Two distinct strings produced the same code.
#[derive(Debug, Clone, Error)]
#[error("strings {first:?} and {second:?} are both producing the value {hash}")]
pub struct CollisionError {
    /// The shared code.
    pub hash: u64,
    /// The string that owns the code.
    pub first: String,
    /// The rejected candidate.
    pub second: String,
}

/// A generator ran out of attempts to find a fresh string.
#[derive(Debug, Clone, Error)]
#[error(
    "{generator} gave up after {attempts} attempts; \
     last candidate hashed to {hash} already owned by {existing:?}"
)]
pub struct GenerationError {
    /// Name of the generator that gave up.
    pub generator: String,
    /// Attempts made before giving up.
    pub attempts: u64,
    /// Code of the last rejected candidate.
    pub hash: u64,
    /// The string that owns that code.
    pub existing: String,
}

/// Called with the code and both strings when interning detects a
/// collision. Returning normally means the caller keeps the id it computed
/// (and may retry with a different string).
pub type CollisionHandler = fn(hash: u64, first: &str, second: &str);

/// Called after each generation attempt that did not produce a fresh
/// string, with the attempt number, the generator's name, the candidate's
/// code, and the string currently owning that code. Returns whether the
/// generator should try again.
pub type GenerationHandler = fn(attempts: u64, generator: &str, hash: u64, existing: &str) -> bool;

/// Attempts the default generation handler allows before giving up.
pub const DEFAULT_GENERATION_ATTEMPTS: u64 = 8;

fn default_collision_handler(hash: u64, first: &str, second: &str) {
    panic!(
        "{}",
        CollisionError {
            hash,
            first: first.into(),
            second: second.into(),
        }
    );
}

fn default_generation_handler(attempts: u64, generator: &str, hash: u64, existing: &str) -> bool {
    if attempts < DEFAULT_GENERATION_ATTEMPTS {
        return true;
    }
    panic!(
        "{}",
        GenerationError {
            generator: generator.into(),
            attempts,
            hash,
            existing: existing.into(),
        }
    );
}

static COLLISION_HANDLER: RwLock<CollisionHandler> = RwLock::new(default_collision_handler);
static GENERATION_HANDLER: RwLock<GenerationHandler> = RwLock::new(default_generation_handler);

/// Installs `handler` process-wide and returns the one it replaces.
pub fn set_collision_handler(handler: CollisionHandler) -> CollisionHandler {
    let mut slot = COLLISION_HANDLER
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    std::mem::replace(&mut *slot, handler)
}

/// The currently installed collision handler.
pub fn collision_handler() -> CollisionHandler {
    *COLLISION_HANDLER
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Installs `handler` process-wide and returns the one it replaces.
pub fn set_generation_handler(handler: GenerationHandler) -> GenerationHandler {
    let mut slot = GENERATION_HANDLER
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    std::mem::replace(&mut *slot, handler)
}

/// The currently installed generation handler.
pub fn generation_handler() -> GenerationHandler {
    *GENERATION_HANDLER
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: error messages carry both strings and the shared code.
    #[test]
    fn collision_message_names_both_strings() {
        let err = CollisionError {
            hash: 42,
            first: "a".into(),
            second: "b".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"a\""), "{msg}");
        assert!(msg.contains("\"b\""), "{msg}");
        assert!(msg.contains("42"), "{msg}");
    }

    #[test]
    fn generation_message_names_generator() {
        let err = GenerationError {
            generator: "CounterGenerator".into(),
            attempts: 8,
            hash: 7,
            existing: "taken".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CounterGenerator"), "{msg}");
        assert!(msg.contains('8'), "{msg}");
    }
}
