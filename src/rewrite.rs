//! Streaming rewriter.
//!
//! Walks a [`RenameTrie`] over an input byte sequence in a single forward
//! pass, replacing every matched key with its mapped value and passing
//! everything else through unchanged. Matching is greedy and non-overlapping:
//! a match completes at the first terminal node reached, and a failed partial
//! match is flushed as-is with only the failing byte re-examined against the
//! root table. Bytes inside a failed span are never rescanned, so a key that
//! begins mid-span can go undetected; that trade keeps the pass strictly
//! forward with no backtracking.
//!
//! Matched bytes are held in an active-match buffer until the match resolves,
//! so replacements of a different length than their match never disturb the
//! bytes that follow. The rewriter only reads the tree; any number of rewrites
//! may run concurrently over one tree as long as no mutation is in flight.

use smallvec::SmallVec;

use crate::trie::{Mapping, Node, RenameTrie};

/// Most identifiers fit inline; longer matches spill to the heap.
const MATCH_BUF_INLINE: usize = 64;

/// Outcome of rewriting one byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The rewritten bytes.
    pub data: Vec<u8>,
    /// Number of matches that substituted a replacement value.
    pub replacements: usize,
    /// Number of complete matches against identity mappings. These pass their
    /// bytes through unchanged and never count as replacements.
    pub identity_hits: usize,
}

/// Rewrite `input` against `trie` in one forward pass.
pub fn rewrite(trie: &RenameTrie, input: &[u8]) -> Rewritten {
    let mut out = Vec::with_capacity(input.len());
    let mut buf: SmallVec<[u8; MATCH_BUF_INLINE]> = SmallVec::new();
    let mut current: Option<&Node<u8, Vec<u8>>> = None;
    let mut replacements = 0usize;
    let mut identity_hits = 0usize;

    for &c in input {
        if let Some(node) = current {
            if let Some(next) = node.child(&c) {
                buf.push(c);
                match next.mapping() {
                    Some(Mapping::Replace(value)) => {
                        out.extend_from_slice(value);
                        replacements += 1;
                        buf.clear();
                        current = None;
                    }
                    Some(Mapping::Identity) => {
                        out.extend_from_slice(&buf);
                        identity_hits += 1;
                        buf.clear();
                        current = None;
                    }
                    None => current = Some(next),
                }
                continue;
            }
            // Partial match failed: flush the buffered span unchanged, then
            // fall through and re-examine `c` itself against the root table.
            out.extend_from_slice(&buf);
            buf.clear();
            current = None;
        }

        match trie.lookup(&c) {
            Some(node) => match node.mapping() {
                Some(Mapping::Replace(value)) => {
                    out.extend_from_slice(value);
                    replacements += 1;
                }
                Some(Mapping::Identity) => {
                    out.push(c);
                    identity_hits += 1;
                }
                None => {
                    buf.push(c);
                    current = Some(node);
                }
            },
            None => out.push(c),
        }
    }

    // An unresolved partial match at end of input passes through unchanged.
    out.extend_from_slice(&buf);

    Rewritten {
        data: out,
        replacements,
        identity_hits,
    }
}
