//! StringId: a string reduced to its 64-bit code plus the store that can
//! recover it.

use crate::chain::InsertOutcome;
use crate::error::collision_handler;
use crate::hash::{fnv1a, hash_str};
use crate::store::Store;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A lightweight identifier for an interned string.
///
/// Only the code and a store reference are kept, so ids copy and compare
/// as cheaply as integers. The string itself lives in the store and comes
/// back via [`StringId::string`].
#[derive(Copy, Clone)]
pub struct StringId<'s> {
    hash: u64,
    store: &'s dyn Store,
}

impl<'s> StringId<'s> {
    /// Interns `s` in `store` and returns its id.
    ///
    /// On a collision the process-wide collision handler is invoked with
    /// the code and both strings; if the handler returns, the id still
    /// carries the code it computed.
    pub fn new(s: &str, store: &'s dyn Store) -> Self {
        let (id, outcome) = Self::new_with_status(s, store);
        if outcome == InsertOutcome::Collision {
            id.report_collision(s);
        }
        id
    }

    /// Like [`StringId::new`], but hands back the raw insertion outcome
    /// instead of invoking the collision handler.
    pub fn new_with_status(s: &str, store: &'s dyn Store) -> (Self, InsertOutcome) {
        let hash = hash_str(s);
        let outcome = store.insert(hash, s);
        (Self { hash, store }, outcome)
    }

    /// Interns `suffix` appended to the already-interned `prefix`, in the
    /// prefix's store.
    ///
    /// The code continues the prefix's code over the suffix bytes, so the
    /// prefix is never rehashed; the store composes the full string from
    /// its own copy of the prefix.
    pub fn with_prefix(prefix: &StringId<'s>, suffix: &str) -> Self {
        let (id, outcome) = Self::with_prefix_status(prefix, suffix);
        if outcome == InsertOutcome::Collision {
            let head = prefix.string();
            let mut candidate = String::with_capacity(head.len() + suffix.len());
            candidate.push_str(&head);
            candidate.push_str(suffix);
            id.report_collision(&candidate);
        }
        id
    }

    /// Like [`StringId::with_prefix`], but hands back the raw insertion
    /// outcome instead of invoking the collision handler.
    pub fn with_prefix_status(prefix: &StringId<'s>, suffix: &str) -> (Self, InsertOutcome) {
        let hash = fnv1a(suffix.as_bytes(), prefix.hash);
        let outcome = prefix.store.insert_prefixed(hash, prefix.hash, suffix);
        (
            Self {
                hash,
                store: prefix.store,
            },
            outcome,
        )
    }

    fn report_collision(&self, candidate: &str) {
        let existing = self.store.lookup(self.hash);
        log::debug!(
            "code {:#x} collides: {existing:?} vs candidate {candidate:?}",
            self.hash
        );
        collision_handler()(self.hash, &existing, candidate);
    }

    /// The 64-bit code.
    pub fn hash_code(&self) -> u64 {
        self.hash
    }

    /// The store this id lives in.
    pub fn store(&self) -> &'s dyn Store {
        self.store
    }

    /// Recovers the interned string from the store.
    pub fn string(&self) -> Arc<str> {
        self.store.lookup(self.hash)
    }
}

impl PartialEq for StringId<'_> {
    /// Ids are equal when they come from the same store instance and carry
    /// the same code.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.store, other.store) && self.hash == other.hash
    }
}

impl Eq for StringId<'_> {}

impl PartialEq<u64> for StringId<'_> {
    fn eq(&self, code: &u64) -> bool {
        self.hash == *code
    }
}

impl PartialEq<StringId<'_>> for u64 {
    fn eq(&self, id: &StringId<'_>) -> bool {
        *self == id.hash
    }
}

impl Hash for StringId<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for StringId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringId")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}
