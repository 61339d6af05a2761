//! Snapshot substring search.
//!
//! Lets a user look up a rename by either side: a hit on the key yields the
//! value, a hit on the value yields the key. Each call derives from a
//! snapshot taken at call time, so a concurrent rebuild never disturbs an
//! iteration already handed out.

use std::collections::HashMap;

use crate::trie::Mapping;

/// Lazy results of one substring search over a trie snapshot.
///
/// Containment is case-insensitive. Identity pairs carry no replacement and
/// are never yielded.
pub struct SearchResults {
    pairs: std::vec::IntoIter<(String, String)>,
    query: String,
}

impl SearchResults {
    /// Search `snapshot` for `query`.
    pub fn over(snapshot: HashMap<Box<[u8]>, Mapping<Vec<u8>>>, query: &str) -> Self {
        let pairs = snapshot
            .into_iter()
            .filter_map(|(key, mapping)| match mapping {
                Mapping::Identity => None,
                Mapping::Replace(value) => Some((
                    String::from_utf8_lossy(&key).into_owned(),
                    String::from_utf8_lossy(&value).into_owned(),
                )),
            })
            .collect::<Vec<_>>()
            .into_iter();
        Self {
            pairs,
            query: query.to_lowercase(),
        }
    }
}

impl Iterator for SearchResults {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for (key, value) in &mut self.pairs {
            if key.to_lowercase().contains(&self.query) {
                return Some(value);
            }
            if value.to_lowercase().contains(&self.query) {
                return Some(key);
            }
        }
        None
    }
}
