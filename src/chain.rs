//! Sorted bucket chains over a shared entry arena.
//!
//! Entries live in a slot map owned by the table; a chain is just a head
//! key, and each entry carries the key of its successor. Keeping the links
//! as arena keys means a rehash only rewrites links: entry storage, and
//! therefore every string handed out so far, stays where it is.

use slotmap::{DefaultKey, SlotMap};
use std::sync::Arc;

/// Result of a table or store insertion.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    /// The string was not known and is now stored under its code.
    Inserted,
    /// The exact same string was already stored under this code.
    AlreadyPresent,
    /// A different string already owns this code; nothing was stored.
    Collision,
}

/// One interned string. Created at insertion, never mutated; only the
/// `next` link changes when a rehash relinks the entry.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) hash: u64,
    pub(crate) next: Option<DefaultKey>,
    pub(crate) string: Arc<str>,
}

pub(crate) type Arena = SlotMap<DefaultKey, Entry>;

/// Where a code sits (or would sit) in a chain.
enum Position {
    /// An entry with this exact code.
    Found(DefaultKey),
    /// No such entry; splice between `prev` (`None` = chain head) and `next`.
    Vacant {
        prev: Option<DefaultKey>,
        next: Option<DefaultKey>,
    },
}

/// A bucket: the ordered singly-linked chain of entries sharing one slot.
///
/// Entries are strictly ascending by hash code; two entries in one chain
/// never share a code.
#[derive(Debug, Default)]
pub(crate) struct Chain {
    head: Option<DefaultKey>,
}

impl Chain {
    /// Scans from the head, stopping at the first entry whose code is not
    /// less than `hash`.
    fn find_position(&self, arena: &Arena, hash: u64) -> Position {
        let mut prev = None;
        let mut cur = self.head;
        while let Some(key) = cur {
            let entry = &arena[key];
            if entry.hash < hash {
                prev = cur;
                cur = entry.next;
            } else if entry.hash == hash {
                return Position::Found(key);
            } else {
                break;
            }
        }
        Position::Vacant { prev, next: cur }
    }

    fn splice(
        &mut self,
        arena: &mut Arena,
        prev: Option<DefaultKey>,
        key: DefaultKey,
        next: Option<DefaultKey>,
    ) {
        arena[key].next = next;
        match prev {
            Some(p) => arena[p].next = Some(key),
            None => self.head = Some(key),
        }
    }

    /// Inserts the string `prefix ++ suffix` under `hash`, bumping `items`
    /// when a new entry is created.
    ///
    /// An occupied position is compared byte-for-byte against the candidate
    /// before anything is allocated; a mismatch reports `Collision` and the
    /// chain is left untouched.
    pub(crate) fn insert(
        &mut self,
        arena: &mut Arena,
        items: &mut usize,
        hash: u64,
        prefix: Option<&str>,
        suffix: &str,
    ) -> InsertOutcome {
        match self.find_position(arena, hash) {
            Position::Found(key) => {
                if matches_parts(&arena[key].string, prefix, suffix) {
                    InsertOutcome::AlreadyPresent
                } else {
                    InsertOutcome::Collision
                }
            }
            Position::Vacant { prev, next } => {
                let string = concat_parts(prefix, suffix);
                let key = arena.insert(Entry { hash, next, string });
                self.splice(arena, prev, key, next);
                *items += 1;
                InsertOutcome::Inserted
            }
        }
    }

    /// Relinks every entry into `new_chains` by `hash % new_chains.len()`,
    /// leaving this chain empty. Entry storage is untouched.
    ///
    /// Panics if a destination already holds the code: codes are unique
    /// across the whole table, so a duplicate here means the table is
    /// corrupt.
    pub(crate) fn export_to(&mut self, arena: &mut Arena, new_chains: &mut [Chain]) {
        let slots = new_chains.len() as u64;
        let mut cur = self.head;
        while let Some(key) = cur {
            let entry = &arena[key];
            let hash = entry.hash;
            cur = entry.next;
            let target = &mut new_chains[(hash % slots) as usize];
            match target.find_position(arena, hash) {
                Position::Found(_) => {
                    panic!("duplicate code {hash:#x} while redistributing entries")
                }
                Position::Vacant { prev, next } => target.splice(arena, prev, key, next),
            }
        }
        self.head = None;
    }

    /// Returns the string stored under `hash`, or `None` if the chain does
    /// not hold the code.
    pub(crate) fn get<'a>(&self, arena: &'a Arena, hash: u64) -> Option<&'a Arc<str>> {
        let mut cur = self.head;
        while let Some(key) = cur {
            let entry = &arena[key];
            if entry.hash < hash {
                cur = entry.next;
            } else if entry.hash == hash {
                return Some(&entry.string);
            } else {
                break;
            }
        }
        None
    }

    /// The codes in this chain, in link order.
    #[cfg(test)]
    pub(crate) fn hashes(&self, arena: &Arena) -> Vec<u64> {
        let mut out = Vec::new();
        let mut cur = self.head;
        while let Some(key) = cur {
            out.push(arena[key].hash);
            cur = arena[key].next;
        }
        out
    }
}

fn matches_parts(stored: &str, prefix: Option<&str>, suffix: &str) -> bool {
    let prefix = prefix.unwrap_or("");
    stored.len() == prefix.len() + suffix.len()
        && stored.starts_with(prefix)
        && stored.ends_with(suffix)
}

fn concat_parts(prefix: Option<&str>, suffix: &str) -> Arc<str> {
    match prefix {
        None | Some("") => Arc::from(suffix),
        Some(p) => {
            let mut s = String::with_capacity(p.len() + suffix.len());
            s.push_str(p);
            s.push_str(suffix);
            Arc::from(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(chain: &mut Chain, arena: &mut Arena, hash: u64, s: &str) -> InsertOutcome {
        let mut items = 0;
        chain.insert(arena, &mut items, hash, None, s)
    }

    /// Invariant: entries are kept strictly ascending by code no matter the
    /// insertion order.
    #[test]
    fn inserts_keep_ascending_order() {
        let mut arena = Arena::with_key();
        let mut chain = Chain::default();
        for (hash, s) in [(40, "d"), (10, "a"), (30, "c"), (20, "b")] {
            assert_eq!(insert(&mut chain, &mut arena, hash, s), InsertOutcome::Inserted);
        }
        assert_eq!(chain.hashes(&arena), vec![10, 20, 30, 40]);
        assert_eq!(&**chain.get(&arena, 30).unwrap(), "c");
    }

    /// Invariant: the same (code, string) pair inserts once and then reports
    /// `AlreadyPresent` without growing the chain.
    #[test]
    fn duplicate_reports_already_present() {
        let mut arena = Arena::with_key();
        let mut chain = Chain::default();
        let mut items = 0;
        assert_eq!(
            chain.insert(&mut arena, &mut items, 7, None, "seven"),
            InsertOutcome::Inserted
        );
        assert_eq!(
            chain.insert(&mut arena, &mut items, 7, None, "seven"),
            InsertOutcome::AlreadyPresent
        );
        assert_eq!(items, 1);
        assert_eq!(chain.hashes(&arena), vec![7]);
    }

    /// Invariant: a different string under an occupied code is rejected and
    /// nothing is mutated: not the count, not the stored string.
    #[test]
    fn collision_rejected_without_mutation() {
        let mut arena = Arena::with_key();
        let mut chain = Chain::default();
        let mut items = 0;
        chain.insert(&mut arena, &mut items, 7, None, "seven");
        assert_eq!(
            chain.insert(&mut arena, &mut items, 7, None, "eight"),
            InsertOutcome::Collision
        );
        assert_eq!(items, 1);
        assert_eq!(&**chain.get(&arena, 7).unwrap(), "seven");
    }

    /// Invariant: a stored string composed from a prefix compares equal to
    /// the same parts and collides with different parts of equal total
    /// length.
    #[test]
    fn prefixed_candidate_comparison() {
        let mut arena = Arena::with_key();
        let mut chain = Chain::default();
        let mut items = 0;
        chain.insert(&mut arena, &mut items, 5, Some("dir/"), "leaf");
        assert_eq!(&**chain.get(&arena, 5).unwrap(), "dir/leaf");

        assert_eq!(
            chain.insert(&mut arena, &mut items, 5, Some("dir/"), "leaf"),
            InsertOutcome::AlreadyPresent
        );
        // Whole-string equality, so the same text with a different split is
        // still the same entry.
        assert_eq!(
            chain.insert(&mut arena, &mut items, 5, Some("dir"), "/leaf"),
            InsertOutcome::AlreadyPresent
        );
        assert_eq!(
            chain.insert(&mut arena, &mut items, 5, None, "dir/left"),
            InsertOutcome::Collision
        );
    }

    /// Invariant: exporting distributes by `hash % slots`, preserves order
    /// in every destination, and empties the source.
    #[test]
    fn export_redistributes_and_empties() {
        let mut arena = Arena::with_key();
        let mut chain = Chain::default();
        let mut items = 0;
        for hash in [1, 2, 3, 4, 5, 6] {
            chain.insert(&mut arena, &mut items, hash, None, &hash.to_string());
        }

        let mut new_chains = [Chain::default(), Chain::default()];
        chain.export_to(&mut arena, &mut new_chains);

        assert_eq!(chain.hashes(&arena), Vec::<u64>::new());
        assert_eq!(new_chains[0].hashes(&arena), vec![2, 4, 6]);
        assert_eq!(new_chains[1].hashes(&arena), vec![1, 3, 5]);
        assert_eq!(&**new_chains[1].get(&arena, 5).unwrap(), "5");
    }

    /// Invariant: an absent code resolves to `None`, present codes to their
    /// string.
    #[test]
    fn get_absent_is_none() {
        let mut arena = Arena::with_key();
        let mut chain = Chain::default();
        let mut items = 0;
        chain.insert(&mut arena, &mut items, 10, None, "ten");
        chain.insert(&mut arena, &mut items, 30, None, "thirty");
        assert!(chain.get(&arena, 20).is_none());
        assert!(chain.get(&arena, 40).is_none());
        assert!(chain.get(&arena, 5).is_none());
        assert_eq!(&**chain.get(&arena, 10).unwrap(), "ten");
    }
}
