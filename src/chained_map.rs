//! ChainedMap: a growable table of sorted bucket chains keyed by 64-bit
//! codes.
//!
//! The table owns the entry arena and the chain array. Growth doubles the
//! array and relinks every entry into its new slot; strings are never
//! copied or reallocated, so contents handed out before a growth event stay
//! valid after it.

use crate::chain::{Arena, Chain, InsertOutcome};
use std::sync::Arc;

#[derive(Debug)]
pub struct ChainedMap {
    chains: Box<[Chain]>,
    arena: Arena,
    items: usize,
    max_load_factor: f64,
    next_resize: usize,
}

impl ChainedMap {
    const GROWTH_FACTOR: usize = 2;

    /// Creates a table with `slots` buckets that grows once the number of
    /// stored strings reaches `floor(slots * max_load_factor)`.
    pub fn new(slots: usize, max_load_factor: f64) -> Self {
        assert!(slots > 0, "need at least one bucket");
        assert!(
            max_load_factor > 0.0 && max_load_factor.is_finite(),
            "load factor must be positive and finite"
        );
        Self {
            chains: make_chains(slots),
            arena: Arena::with_key(),
            items: 0,
            max_load_factor,
            next_resize: (slots as f64 * max_load_factor).floor() as usize,
        }
    }

    /// Number of stored strings.
    pub fn len(&self) -> usize {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Current number of buckets.
    pub fn slot_count(&self) -> usize {
        self.chains.len()
    }

    /// Stores the string `prefix ++ suffix` under `hash`.
    ///
    /// Growth runs first when this insert would reach the load threshold,
    /// so the pending entry lands in the new layout. The check runs whether
    /// or not the insert turns out to create an entry.
    pub fn insert(&mut self, hash: u64, prefix: Option<&str>, suffix: &str) -> InsertOutcome {
        if self.items + 1 >= self.next_resize {
            self.grow();
        }
        let slot = (hash % self.chains.len() as u64) as usize;
        self.chains[slot].insert(&mut self.arena, &mut self.items, hash, prefix, suffix)
    }

    /// Returns the string stored under `hash`.
    ///
    /// The code must have been inserted before; interning callers guarantee
    /// that by always inserting before they construct a code they look up.
    /// Panics on a code that was never inserted.
    pub fn lookup(&self, hash: u64) -> Arc<str> {
        let slot = (hash % self.chains.len() as u64) as usize;
        match self.chains[slot].get(&self.arena, hash) {
            Some(string) => Arc::clone(string),
            None => panic!("code {hash:#x} was never interned"),
        }
    }

    /// True if `hash` has been inserted. Once true, stays true for the life
    /// of the table.
    pub fn contains(&self, hash: u64) -> bool {
        let slot = (hash % self.chains.len() as u64) as usize;
        self.chains[slot].get(&self.arena, hash).is_some()
    }

    fn grow(&mut self) {
        let new_slots = Self::GROWTH_FACTOR * self.chains.len();
        let mut new_chains = make_chains(new_slots);
        for chain in self.chains.iter_mut() {
            chain.export_to(&mut self.arena, &mut new_chains);
        }
        log::trace!(
            "grew from {} to {new_slots} slots holding {} strings",
            self.chains.len(),
            self.items
        );
        self.chains = new_chains;
        self.next_resize = (new_slots as f64 * self.max_load_factor).floor() as usize;
    }

    /// Codes per chain, in link order. Test hook for the ordering and
    /// placement invariants.
    #[cfg(test)]
    pub(crate) fn chain_hashes(&self) -> Vec<Vec<u64>> {
        self.chains.iter().map(|c| c.hashes(&self.arena)).collect()
    }
}

impl Default for ChainedMap {
    /// 16 buckets, load factor 1.0.
    fn default() -> Self {
        Self::new(16, 1.0)
    }
}

fn make_chains(slots: usize) -> Box<[Chain]> {
    std::iter::repeat_with(Chain::default).take(slots).collect()
}
