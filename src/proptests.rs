use super::*;

use proptest::prelude::*;

fn trie_with(pairs: &[(&[u8], &[u8])]) -> RenameTrie {
    let mut trie = RenameTrie::new();
    for (key, value) in pairs {
        trie.insert_or_update(key, Mapping::Replace(value.to_vec()))
            .unwrap();
    }
    trie
}

proptest! {
    /// Inputs sharing no symbols with any key pass through untouched.
    #[test]
    fn no_match_input_is_unchanged(input in "[A-Z0-9 .;]{0,200}") {
        let trie = trie_with(&[(b"foo", b"bar"), (b"qux", b"n"), (b"x_long", b"y")]);
        let r = rewrite(&trie, input.as_bytes());
        prop_assert_eq!(r.data, input.into_bytes());
        prop_assert_eq!(r.replacements, 0);
        prop_assert_eq!(r.identity_hits, 0);
    }

    /// Every planted occurrence is replaced and the surrounding filler
    /// survives byte for byte, however much the replacement length differs
    /// from the key length.
    #[test]
    fn planted_occurrences_are_replaced_exactly(
        key in "[a-z_]{1,12}",
        value in "[a-zA-Z_]{0,24}",
        fillers in prop::collection::vec("[A-Z0-9 ]{0,10}", 1..8),
    ) {
        let trie = trie_with(&[(key.as_bytes(), value.as_bytes())]);

        let mut input = Vec::new();
        let mut expected = Vec::new();
        for (i, filler) in fillers.iter().enumerate() {
            if i > 0 {
                input.extend_from_slice(key.as_bytes());
                expected.extend_from_slice(value.as_bytes());
            }
            input.extend_from_slice(filler.as_bytes());
            expected.extend_from_slice(filler.as_bytes());
        }

        let r = rewrite(&trie, &input);
        prop_assert_eq!(r.replacements, fillers.len() - 1);
        prop_assert_eq!(r.data, expected);
    }

    /// Output length follows directly from the replacement count.
    #[test]
    fn output_length_matches_replacement_arithmetic(
        key in "[a-z]{1,8}",
        value in "[a-z]{0,32}",
        occurrences in 0usize..6,
    ) {
        let trie = trie_with(&[(key.as_bytes(), value.as_bytes())]);
        let mut input = Vec::new();
        for _ in 0..occurrences {
            input.extend_from_slice(key.as_bytes());
            input.push(b'!');
        }

        let r = rewrite(&trie, &input);
        prop_assert_eq!(r.replacements, occurrences);
        prop_assert_eq!(
            r.data.len(),
            input.len() + occurrences * value.len() - occurrences * key.len()
        );
    }

    /// Entry count equals the number of distinct keys, in any insertion order.
    #[test]
    fn count_equals_distinct_keys(
        keys in prop::collection::hash_set("[a-z]{1,10}", 0..50),
    ) {
        let mut trie = RenameTrie::new();
        for key in &keys {
            trie.insert_or_update(key.as_bytes(), Mapping::Replace(b"v".to_vec()))
                .unwrap();
        }
        prop_assert_eq!(trie.len(), keys.len());
        for key in &keys {
            prop_assert!(trie.get(key.as_bytes()).is_some());
        }
    }

    /// Re-insertion overwrites the value without disturbing the count.
    #[test]
    fn reinsertion_is_last_writer_wins(
        key in "[a-z]{1,10}",
        first in "[a-z]{1,10}",
        second in "[a-z]{1,10}",
    ) {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(key.as_bytes(), Mapping::Replace(first.into_bytes()))
            .unwrap();
        trie.insert_or_update(key.as_bytes(), Mapping::Replace(second.clone().into_bytes()))
            .unwrap();
        prop_assert_eq!(trie.len(), 1);
        prop_assert_eq!(
            trie.get(key.as_bytes()),
            Some(&Mapping::Replace(second.into_bytes()))
        );
    }
}
