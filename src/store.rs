//! The store trait and its no-op, single-threaded, and mutex-guarded
//! variants.
//!
//! Many ids borrow one store at the same time, so the trait takes `&self`
//! everywhere and each variant brings its own interior mutability: nothing
//! (`NullStore`), a `RefCell` (`SingleThreadedStore`), or a `Mutex`
//! (`ThreadSafeStore`).

use crate::chain::InsertOutcome;
use crate::chained_map::ChainedMap;
use std::cell::RefCell;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared interning surface behind every id.
pub trait Store {
    /// Stores `string` under `hash`.
    fn insert(&self, hash: u64, string: &str) -> InsertOutcome;

    /// Stores the concatenation of the already-interned prefix and `suffix`
    /// under `hash`.
    ///
    /// The default recovers the prefix and inserts the materialized
    /// concatenation. Stores with direct table access override this to hand
    /// both parts down instead, skipping the temporary string; the two
    /// paths are semantically identical.
    fn insert_prefixed(&self, hash: u64, prefix_hash: u64, suffix: &str) -> InsertOutcome {
        let prefix = self.lookup(prefix_hash);
        let mut full = String::with_capacity(prefix.len() + suffix.len());
        full.push_str(&prefix);
        full.push_str(suffix);
        self.insert(hash, &full)
    }

    /// Returns the string stored under `hash`.
    ///
    /// The code must have been inserted before (ids always insert in their
    /// constructor); see [`ChainedMap::lookup`].
    fn lookup(&self, hash: u64) -> Arc<str>;
}

/// A store that never saves anything: inserts succeed without storing and
/// every lookup returns a fixed placeholder.
#[derive(Debug, Clone)]
pub struct NullStore {
    sentinel: Arc<str>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self {
            sentinel: Arc::from("string store disabled"),
        }
    }
}

impl Store for NullStore {
    fn insert(&self, _hash: u64, _string: &str) -> InsertOutcome {
        InsertOutcome::Inserted
    }

    fn insert_prefixed(&self, _hash: u64, _prefix_hash: u64, _suffix: &str) -> InsertOutcome {
        InsertOutcome::Inserted
    }

    fn lookup(&self, _hash: u64) -> Arc<str> {
        Arc::clone(&self.sentinel)
    }
}

/// A store for single-threaded use; not `Sync` by construction.
#[derive(Debug, Default)]
pub struct SingleThreadedStore {
    map: RefCell<ChainedMap>,
}

impl SingleThreadedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds on a table with explicit geometry.
    pub fn with_table(map: ChainedMap) -> Self {
        Self {
            map: RefCell::new(map),
        }
    }

    /// Number of stored strings.
    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl Store for SingleThreadedStore {
    fn insert(&self, hash: u64, string: &str) -> InsertOutcome {
        self.map.borrow_mut().insert(hash, None, string)
    }

    fn insert_prefixed(&self, hash: u64, prefix_hash: u64, suffix: &str) -> InsertOutcome {
        let mut map = self.map.borrow_mut();
        let prefix = map.lookup(prefix_hash);
        map.insert(hash, Some(&prefix), suffix)
    }

    fn lookup(&self, hash: u64) -> Arc<str> {
        self.map.borrow().lookup(hash)
    }
}

/// A store that serializes every operation, growth included, behind one
/// exclusive lock. Lookups take the same lock; there is no read-only fast
/// path.
#[derive(Debug, Default)]
pub struct ThreadSafeStore {
    map: Mutex<ChainedMap>,
}

impl ThreadSafeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds on a table with explicit geometry.
    pub fn with_table(map: ChainedMap) -> Self {
        Self {
            map: Mutex::new(map),
        }
    }

    /// Number of stored strings.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, ChainedMap> {
        // A panic under the lock is always a fail-fast contract violation;
        // the table is never left half-updated, so poisoning is ignored.
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for ThreadSafeStore {
    fn insert(&self, hash: u64, string: &str) -> InsertOutcome {
        self.lock().insert(hash, None, string)
    }

    fn insert_prefixed(&self, hash: u64, prefix_hash: u64, suffix: &str) -> InsertOutcome {
        let mut map = self.lock();
        let prefix = map.lookup(prefix_hash);
        map.insert(hash, Some(&prefix), suffix)
    }

    fn lookup(&self, hash: u64) -> Arc<str> {
        self.lock().lookup(hash)
    }
}

/// The store selected by the crate's feature flags: mutex-guarded by
/// default, single-threaded without `multithreaded`, and the no-op store
/// without `store`.
#[cfg(all(feature = "store", feature = "multithreaded"))]
pub type DefaultStore = ThreadSafeStore;
#[cfg(all(feature = "store", not(feature = "multithreaded")))]
pub type DefaultStore = SingleThreadedStore;
#[cfg(not(feature = "store"))]
pub type DefaultStore = NullStore;
