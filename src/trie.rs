//! Symbol-sequence prefix tree.
//!
//! Maps ordered, non-empty sequences of symbols to one mapping outcome per
//! complete sequence. Branching is per symbol, so memory grows with the number
//! of distinct prefixes rather than the number of keys, and the rewriter can
//! walk the tree one symbol at a time with an O(1) transition per step.
//!
//! The tree is not internally synchronized. Mutation requires external mutual
//! exclusion, and readers must not overlap an in-progress mutation window;
//! [`crate::RemapIndex`] provides that discipline for the shared case.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Error;

/// Terminal outcome stored for a complete key sequence.
///
/// `Identity` marks a key that maps to itself. It is kept in the tree so that
/// lookups and statistics see it, but rewriting treats it as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping<V> {
    /// Key maps to itself; rewrite passes the matched bytes through unchanged.
    Identity,
    /// Key maps to a replacement value.
    Replace(V),
}

impl<V> Mapping<V> {
    /// The replacement value, or `None` for an identity mapping.
    pub fn replacement(&self) -> Option<&V> {
        match self {
            Mapping::Identity => None,
            Mapping::Replace(v) => Some(v),
        }
    }
}

/// One symbol position reached from some path of ancestor symbols.
///
/// A node records the full key sequence that produced it only when it is
/// terminal; interior nodes carry just their own symbol and children.
#[derive(Debug)]
pub struct Node<K, V> {
    symbol: K,
    key: Option<Box<[K]>>,
    mapping: Option<Mapping<V>>,
    children: HashMap<K, Node<K, V>>,
}

impl<K: Eq + Hash + Clone, V> Node<K, V> {
    fn new(symbol: K) -> Self {
        Self {
            symbol,
            key: None,
            mapping: None,
            children: HashMap::new(),
        }
    }

    /// The next node along `symbol`, if any inserted key continues this way.
    pub fn child(&self, symbol: &K) -> Option<&Node<K, V>> {
        self.children.get(symbol)
    }

    /// The terminal mapping, present iff some inserted key ends exactly here.
    pub fn mapping(&self) -> Option<&Mapping<V>> {
        self.mapping.as_ref()
    }

    /// The full key sequence ending at this node. Recorded on terminals only.
    pub fn key(&self) -> Option<&[K]> {
        self.key.as_deref()
    }

    /// Whether this node matches a bare symbol.
    pub fn matches(&self, symbol: &K) -> bool {
        self.symbol == *symbol
    }
}

// Node identity is its own symbol. Siblings always live in one parent's child
// map, so two nodes with equal symbols under different parents never collide.
impl<K: Eq + Hash + Clone, V> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

/// A prefix tree over symbol sequences.
///
/// Alongside the node graph it maintains a flat pair table, kept in sync on
/// every insertion, trading memory for O(n) scans in [`Trie::snapshot`].
#[derive(Debug)]
pub struct Trie<K, V> {
    roots: HashMap<K, Node<K, V>>,
    pairs: HashMap<Box<[K]>, Mapping<V>>,
    count: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> Trie<K, V> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            pairs: HashMap::new(),
            count: 0,
        }
    }

    /// Root-table entry for a first symbol, or `None` if no inserted sequence
    /// starts with it.
    pub fn lookup(&self, symbol: &K) -> Option<&Node<K, V>> {
        self.roots.get(symbol)
    }

    /// Exact full-sequence lookup.
    pub fn get(&self, key: &[K]) -> Option<&Mapping<V>> {
        self.pairs.get(key)
    }

    /// Insert `mapping` at `key`, creating any missing nodes along the path.
    ///
    /// Returns `true` iff this created a new terminal: either a brand-new
    /// path, or an existing interior node that had no mapping before. A plain
    /// value overwrite returns `false` and leaves the entry count unchanged.
    pub fn insert_or_update(&mut self, key: &[K], mapping: Mapping<V>) -> Result<bool, Error> {
        let (first, rest) = key.split_first().ok_or(Error::EmptyKey)?;
        let mut node = self
            .roots
            .entry(first.clone())
            .or_insert_with(|| Node::new(first.clone()));
        for symbol in rest {
            node = node
                .children
                .entry(symbol.clone())
                .or_insert_with(|| Node::new(symbol.clone()));
        }
        let added = node.mapping.is_none();
        let full: Box<[K]> = key.into();
        node.key = Some(full.clone());
        node.mapping = Some(mapping.clone());
        self.pairs.insert(full, mapping);
        if added {
            self.count += 1;
        }
        Ok(added)
    }

    /// Reset the root table, entry count, and pair table to empty.
    pub fn clear(&mut self) {
        self.roots.clear();
        self.pairs.clear();
        self.count = 0;
    }

    /// Immutable copy of all pairs inserted before the call.
    pub fn snapshot(&self) -> HashMap<Box<[K]>, Mapping<V>> {
        self.pairs.clone()
    }

    /// Number of distinct complete key sequences stored.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no key sequence is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for Trie<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The tree shape used for identifier rewriting: byte symbols, byte-string
/// replacements.
pub type RenameTrie = Trie<u8, Vec<u8>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn replace(v: &str) -> Mapping<Vec<u8>> {
        Mapping::Replace(v.as_bytes().to_vec())
    }

    fn walk<'t>(trie: &'t RenameTrie, key: &[u8]) -> Option<&'t Node<u8, Vec<u8>>> {
        let (first, rest) = key.split_first()?;
        let mut node = trie.lookup(first)?;
        for symbol in rest {
            node = node.child(symbol)?;
        }
        Some(node)
    }

    #[test]
    fn insert_then_lookup() {
        let mut trie = RenameTrie::new();
        assert!(trie.insert_or_update(b"foo", replace("bar")).unwrap());

        let node = walk(&trie, b"foo").unwrap();
        assert_eq!(node.mapping(), Some(&replace("bar")));
        assert_eq!(node.key(), Some(&b"foo"[..]));
        assert_eq!(trie.get(b"foo"), Some(&replace("bar")));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn interior_nodes_have_no_mapping() {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(b"foobar", replace("x")).unwrap();

        let node = walk(&trie, b"foo").unwrap();
        assert!(node.mapping().is_none());
        assert!(node.key().is_none());
        assert_eq!(trie.get(b"foo"), None);
    }

    #[test]
    fn count_tracks_distinct_keys() {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(b"foo", replace("1")).unwrap();
        trie.insert_or_update(b"foobar", replace("2")).unwrap();
        trie.insert_or_update(b"fop", replace("3")).unwrap();
        assert_eq!(trie.len(), 3);

        // Terminal on an existing interior path still counts as a new entry.
        assert!(trie.insert_or_update(b"fo", replace("4")).unwrap());
        assert_eq!(trie.len(), 4);
    }

    #[test]
    fn overwrite_keeps_count_and_takes_last_value() {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(b"foo", replace("bar")).unwrap();
        assert!(!trie.insert_or_update(b"foo", replace("baz")).unwrap());
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.get(b"foo"), Some(&replace("baz")));
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut trie = RenameTrie::new();
        assert!(matches!(
            trie.insert_or_update(b"", replace("x")),
            Err(Error::EmptyKey)
        ));
        assert!(trie.is_empty());
    }

    #[test]
    fn identity_mapping_is_a_terminal() {
        let mut trie = RenameTrie::new();
        assert!(trie.insert_or_update(b"same", Mapping::Identity).unwrap());
        assert_eq!(trie.get(b"same"), Some(&Mapping::Identity));
        assert_eq!(trie.get(b"same").unwrap().replacement(), None);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(b"foo", replace("bar")).unwrap();
        trie.clear();
        assert!(trie.is_empty());
        assert!(trie.lookup(&b'f').is_none());
        assert!(trie.snapshot().is_empty());
    }

    #[test]
    fn snapshot_copies_all_pairs() {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(b"foo", replace("bar")).unwrap();
        trie.insert_or_update(b"same", Mapping::Identity).unwrap();

        let snap = trie.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get(&b"foo"[..]), Some(&replace("bar")));

        // Later insertions do not show up in an already-taken snapshot.
        trie.insert_or_update(b"qux", replace("q")).unwrap();
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn node_identity_is_its_symbol() {
        let mut trie = RenameTrie::new();
        trie.insert_or_update(b"ab", replace("1")).unwrap();
        trie.insert_or_update(b"cb", replace("2")).unwrap();

        let ab = trie.lookup(&b'a').unwrap().child(&b'b').unwrap();
        let cb = trie.lookup(&b'c').unwrap().child(&b'b').unwrap();
        assert!(ab.matches(&b'b'));
        assert_eq!(ab, cb);
        assert_ne!(ab.key(), cb.key());
    }
}
