//! intern-map: a string interning map that stores each distinct string
//! once and identifies it thereafter by a fixed-width 64-bit code.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: make comparisons, copies, and map keys on "named" values integer
//!   operations, while keeping the original string recoverable, in safe,
//!   verifiable layers that can be reasoned about independently.
//! - Layers:
//!   - hash: FNV-1a as a `const fn`; seeding with a prior code composes
//!     hashes across prefix boundaries without rehashing the prefix.
//!   - chain: sorted singly-linked bucket chains over a slot-map arena;
//!     three-way insert (new / already present / collision), relink-based
//!     export for rehashing, position search.
//!   - chained_map: the growable table; slot dispatch by `hash % slots`,
//!     load-factor bookkeeping, growth that relinks instead of copying.
//!   - store: one trait over the table with no-op, single-threaded, and
//!     mutex-guarded implementations chosen at construction time.
//!   - string_id: the public id type, a code plus a store reference.
//!   - generator: counter/random candidate generators with a retry
//!     protocol driven by a swappable handler.
//!
//! Constraints
//! - A collision is a return value, not an error: the table never mutates
//!   state on a collision and accepts a fresh candidate afterwards.
//! - Entries are immutable after insertion and are only ever relinked;
//!   string contents handed out stay valid across growth.
//! - No deletion: once a code is present it stays present for the life of
//!   its table.
//! - `ChainedMap` itself is single-threaded and unsynchronized; concurrency
//!   comes only from the mutex-guarded store, which holds one exclusive
//!   lock across every whole operation (growth included).
//!
//! Why this split?
//! - Localize invariants: the ordering invariant lives entirely in `chain`,
//!   the load-factor protocol entirely in `chained_map`.
//! - Clear failure boundaries: the table reports outcomes; only the id
//!   layer escalates collisions to the process-wide handler.
//! - The store trait keeps the disabled/single-threaded/locked choice a
//!   construction-time decision instead of a compile-time fork, with cargo
//!   features selecting only the `DefaultStore` alias.

mod chain;
mod chained_map;
mod chained_map_proptest;
mod error;
mod generator;
mod hash;
mod store;
mod string_id;

// Public surface
pub use chain::InsertOutcome;
pub use chained_map::ChainedMap;
pub use error::{
    collision_handler, generation_handler, set_collision_handler, set_generation_handler,
    CollisionError, CollisionHandler, GenerationError, GenerationHandler,
    DEFAULT_GENERATION_ATTEMPTS,
};
pub use generator::{try_generate, CharacterTable, CounterGenerator, RandomGenerator};
pub use hash::{fnv1a, hash_str, FNV_BASIS, FNV_PRIME};
pub use store::{DefaultStore, NullStore, SingleThreadedStore, Store, ThreadSafeStore};
pub use string_id::StringId;
