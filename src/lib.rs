//! # srcremap
//!
//! Streaming identifier remapping over a symbol-trie index.
//!
//! Given tens of thousands of `old-identifier,new-identifier` rename pairs
//! loaded from line-oriented mapping sources, this crate rewrites arbitrary
//! byte streams by replacing every occurrence of an old identifier with its
//! new one, in a single forward pass and with no lexical awareness beyond
//! literal sequence matching.
//!
//! ## Architecture
//!
//! 1. **Trie** ([`Trie`]): a per-symbol prefix tree holding one mapping per
//!    complete key sequence, plus a flat pair table for snapshot scans.
//! 2. **Ingestion** ([`ingest_sources`]): parses mapping sources in parallel,
//!    serializing insertions into the shared tree.
//! 3. **Rewriter** ([`rewrite`]): greedy single-pass matcher that buffers an
//!    active match and substitutes its replacement on completion.
//! 4. **Index** ([`RemapIndex`]): the shared facade tying the three together
//!    behind a rebuild barrier, with batch rewriting and substring search.
//!
//! ## Example
//!
//! ```rust
//! use srcremap::{ParseOptions, RemapIndex, Source};
//!
//! let index = RemapIndex::new();
//! let header = |line: &str| line.starts_with('#');
//! index
//!     .build(
//!         vec![Source::from_text("mappings", "func_1023,getHealth\n")],
//!         &ParseOptions::new(',', &header),
//!         &|| {},
//!     )
//!     .unwrap();
//!
//! let out = index.rewrite(b"this.func_1023()").unwrap();
//! assert_eq!(out.data, b"this.getHealth()");
//! assert_eq!(out.replacements, 1);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod ingest;
pub mod query;
pub mod rewrite;
pub mod trie;

pub use error::Error;
pub use index::{ArchiveEntry, Batch, RemapIndex};
pub use ingest::{ingest_sources, BuildReport, ParseOptions, Source};
pub use query::SearchResults;
pub use rewrite::{rewrite, Rewritten};
pub use trie::{Mapping, Node, RenameTrie, Trie};

#[cfg(test)]
mod proptests;
