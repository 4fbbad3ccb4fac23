#![cfg(test)]

// Property tests for ChainedMap kept inside the crate so they can check
// the chain-level ordering invariant through the internal test hook.

use crate::chain::InsertOutcome;
use crate::chained_map::ChainedMap;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// hashes/strings, pool lengths shrink, and op lists shrink in length. The
// hash pool is tiny on purpose: collisions and same-slot pile-ups should
// be the common case, not the rare one.
#[derive(Clone, Debug)]
enum Op {
    Insert { hash: u64, s: usize },
    PrefixInsert { prefix: usize, hash: u64, s: usize },
    Contains { hash: u64 },
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=6).prop_flat_map(|pool| {
        let s = 0..pool.len();
        let hash = 0u64..24;
        let op = prop_oneof![
            (hash.clone(), s.clone()).prop_map(|(hash, s)| Op::Insert { hash, s }),
            (any::<usize>(), hash.clone(), s.clone())
                .prop_map(|(prefix, hash, s)| Op::PrefixInsert { prefix, hash, s }),
            hash.clone().prop_map(|hash| Op::Contains { hash }),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Mirror of the growth protocol: the check runs before every insert,
// whether or not it creates an entry.
struct Geometry {
    slots: usize,
    items: usize,
    next_resize: usize,
    max_load_factor: f64,
}

impl Geometry {
    fn new(slots: usize, max_load_factor: f64) -> Self {
        Self {
            slots,
            items: 0,
            next_resize: (slots as f64 * max_load_factor).floor() as usize,
            max_load_factor,
        }
    }

    fn before_insert(&mut self) {
        if self.items + 1 >= self.next_resize {
            self.slots *= 2;
            self.next_resize = (self.slots as f64 * self.max_load_factor).floor() as usize;
        }
    }
}

fn check_invariants(map: &ChainedMap, model: &HashMap<u64, String>, geometry: &Geometry) {
    assert_eq!(map.len(), model.len());
    assert_eq!(map.slot_count(), geometry.slots, "growth point diverged");

    let per_chain = map.chain_hashes();
    let slots = per_chain.len() as u64;
    for (slot, hashes) in per_chain.iter().enumerate() {
        for pair in hashes.windows(2) {
            assert!(pair[0] < pair[1], "slot {slot} not strictly ascending");
        }
        for &hash in hashes {
            assert_eq!(hash % slots, slot as u64, "entry in wrong slot");
        }
    }

    for (&hash, s) in model {
        assert!(map.contains(hash));
        assert_eq!(&*map.lookup(hash), s.as_str());
    }
}

// Property: state-machine equivalence against a HashMap<u64, String> model.
// Invariants exercised across random operation sequences:
// - Outcome parity: Inserted on a fresh code, AlreadyPresent on the same
//   string, Collision on a different string; collisions mutate nothing.
// - Prefixed inserts behave as inserts of the concatenation.
// - Chains stay strictly ascending and correctly placed after every op.
// - The table grows exactly when the modeled protocol says it must.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut = ChainedMap::new(2, 1.0);
        let mut model: HashMap<u64, String> = HashMap::new();
        let mut geometry = Geometry::new(2, 1.0);

        for op in ops {
            match op {
                Op::Insert { hash, s } => {
                    let s = &pool[s];
                    geometry.before_insert();
                    let outcome = sut.insert(hash, None, s);
                    match model.get(&hash) {
                        None => {
                            prop_assert_eq!(outcome, InsertOutcome::Inserted);
                            model.insert(hash, s.clone());
                            geometry.items += 1;
                        }
                        Some(existing) if existing == s => {
                            prop_assert_eq!(outcome, InsertOutcome::AlreadyPresent);
                        }
                        Some(_) => {
                            prop_assert_eq!(outcome, InsertOutcome::Collision);
                        }
                    }
                }
                Op::PrefixInsert { prefix, hash, s } => {
                    if model.is_empty() {
                        continue;
                    }
                    let mut keys: Vec<u64> = model.keys().copied().collect();
                    keys.sort_unstable();
                    let prefix_hash = keys[prefix % keys.len()];
                    let prefix_str = model[&prefix_hash].clone();
                    let suffix = &pool[s];
                    let full = format!("{prefix_str}{suffix}");

                    geometry.before_insert();
                    let outcome = sut.insert(hash, Some(&prefix_str), suffix);
                    match model.get(&hash) {
                        None => {
                            prop_assert_eq!(outcome, InsertOutcome::Inserted);
                            model.insert(hash, full);
                            geometry.items += 1;
                        }
                        Some(existing) if *existing == full => {
                            prop_assert_eq!(outcome, InsertOutcome::AlreadyPresent);
                        }
                        Some(_) => {
                            prop_assert_eq!(outcome, InsertOutcome::Collision);
                        }
                    }
                }
                Op::Contains { hash } => {
                    prop_assert_eq!(sut.contains(hash), model.contains_key(&hash));
                }
            }

            check_invariants(&sut, &model, &geometry);
        }
    }
}
