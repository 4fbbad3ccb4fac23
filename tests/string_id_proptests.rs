// Property tests for the public interning surface, model-checked against
// std::collections::HashMap keyed by the real codes.
use intern_map::{hash_str, ChainedMap, InsertOutcome, SingleThreadedStore, StringId};
use proptest::prelude::*;
use std::collections::HashMap;

// Property: interning any set of strings stores one copy per distinct
// string, resolves every id to its original bytes, and reports Inserted /
// AlreadyPresent in model agreement, across however many growth events
// the tiny initial table needs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_intern_matches_model(strings in proptest::collection::vec(".{0,12}", 1..60)) {
        let store = SingleThreadedStore::with_table(ChainedMap::new(2, 1.0));
        let mut model: HashMap<u64, String> = HashMap::new();

        for s in &strings {
            let (id, outcome) = StringId::new_with_status(s, &store);
            prop_assert_eq!(id.hash_code(), hash_str(s));
            match model.get(&id.hash_code()) {
                None => {
                    prop_assert_eq!(outcome, InsertOutcome::Inserted);
                    model.insert(id.hash_code(), s.clone());
                }
                Some(existing) if existing == s => {
                    prop_assert_eq!(outcome, InsertOutcome::AlreadyPresent);
                }
                // A genuine 64-bit collision in a random vector would be
                // astonishing, but the model covers it.
                Some(_) => {
                    prop_assert_eq!(outcome, InsertOutcome::Collision);
                }
            }
            prop_assert_eq!(store.len(), model.len());
        }

        for (hash, s) in &model {
            let (id, outcome) = StringId::new_with_status(s, &store);
            prop_assert_eq!(outcome, InsertOutcome::AlreadyPresent);
            prop_assert_eq!(id.hash_code(), *hash);
            prop_assert_eq!(&*id.string(), s.as_str());
        }
    }
}

// Property: composing a suffix onto an interned prefix is exactly
// interning the concatenation: same code, same stored string, equal ids.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_prefix_composition(prefix in ".{0,10}", suffix in ".{0,10}") {
        let store = SingleThreadedStore::new();
        let base = StringId::new(&prefix, &store);
        let child = StringId::with_prefix(&base, &suffix);

        let full = format!("{prefix}{suffix}");
        prop_assert_eq!(child.hash_code(), hash_str(&full));
        prop_assert_eq!(&*child.string(), full.as_str());
        prop_assert_eq!(child, StringId::new(&full, &store));
    }
}

// Property: chained prefixing (grandchildren) keeps composing.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_prefix_chains(parts in proptest::collection::vec("[a-z/]{1,6}", 1..6)) {
        let store = SingleThreadedStore::new();
        let mut id = StringId::new(&parts[0], &store);
        for part in &parts[1..] {
            id = StringId::with_prefix(&id, part);
        }
        let full: String = parts.concat();
        prop_assert_eq!(id.hash_code(), hash_str(&full));
        prop_assert_eq!(&*id.string(), full.as_str());
    }
}
