//! Shared index facade.
//!
//! Owns the rename tree behind a [`RwLock`] and enforces the rebuild barrier:
//! a rebuild clears and repopulates the tree while readers are rejected, and
//! once the barrier drops, any number of rewrites and searches may run in
//! parallel over the finished tree.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;

use crate::error::Error;
use crate::ingest::{ingest_sources, BuildReport, ParseOptions, Source};
use crate::query::SearchResults;
use crate::rewrite::{rewrite, Rewritten};
use crate::trie::RenameTrie;

/// One archive entry handed in by the shell's extractor.
///
/// `data` carries the extractor's read result; a failed read is reported in
/// the batch outcome without aborting sibling entries.
pub struct ArchiveEntry {
    /// Entry path within the archive.
    pub name: String,
    /// Whether this entry's bytes should be rewritten. Ineligible entries
    /// pass through unchanged.
    pub rewrite: bool,
    /// The entry's raw bytes, or the read failure that produced none.
    pub data: io::Result<Vec<u8>>,
}

impl ArchiveEntry {
    /// An entry whose bytes arrived intact.
    pub fn new(name: impl Into<String>, rewrite: bool, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            rewrite,
            data: Ok(data),
        }
    }
}

/// Outcome of rewriting one batch of archive entries.
#[derive(Debug, Default)]
pub struct Batch {
    /// Rewritten (or passed-through) entries, ready for the archive writer.
    /// Order is not meaningful under parallel rewriting.
    pub entries: Vec<(String, Vec<u8>)>,
    /// Total replacements across all rewritten entries.
    pub replacements: usize,
    /// Per-entry failures ([`Error::EntryUnavailable`]).
    pub failures: Vec<Error>,
}

/// The shared mapping index: one rename tree plus the rebuild barrier.
pub struct RemapIndex {
    trie: RwLock<RenameTrie>,
    rebuilding: AtomicBool,
}

impl RemapIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self {
            trie: RwLock::new(RenameTrie::new()),
            rebuilding: AtomicBool::new(false),
        }
    }

    /// Clear the tree and rebuild it from `sources`.
    ///
    /// Sources parse in parallel with one write-lock acquisition per
    /// insertion. Readers arriving while the rebuild is up get
    /// [`Error::Rebuilding`], as does a second concurrent `build`.
    /// `progress` ticks once per inserted pair.
    pub fn build(
        &self,
        sources: Vec<Source>,
        options: &ParseOptions<'_>,
        progress: &(dyn Fn() + Sync),
    ) -> Result<BuildReport, Error> {
        if self.rebuilding.swap(true, Ordering::SeqCst) {
            return Err(Error::Rebuilding);
        }
        let start = Instant::now();
        self.trie.write().clear();
        let mut report = ingest_sources(
            sources,
            options,
            |key, mapping| self.trie.write().insert_or_update(key, mapping),
            progress,
        );
        report.entries = self.trie.read().len();
        self.rebuilding.store(false, Ordering::SeqCst);
        log::info!(
            "built index: {} entries ({} lines, {} skipped, {} failed sources) in {:?}",
            report.entries,
            report.lines,
            report.skipped,
            report.failures.len(),
            start.elapsed()
        );
        Ok(report)
    }

    fn read(&self) -> Result<parking_lot::RwLockReadGuard<'_, RenameTrie>, Error> {
        if self.rebuilding.load(Ordering::SeqCst) {
            return Err(Error::Rebuilding);
        }
        Ok(self.trie.read())
    }

    /// Rewrite one byte stream against the current tree.
    pub fn rewrite(&self, input: &[u8]) -> Result<Rewritten, Error> {
        let guard = self.read()?;
        Ok(rewrite(&guard, input))
    }

    /// Rewrite a batch of archive entries in parallel.
    ///
    /// Eligible entries are rewritten, ineligible ones pass through, and
    /// entries whose bytes failed to arrive are recorded as failures without
    /// aborting the rest. Appends to the output list are serialized; each
    /// entry's rewrite runs independently.
    pub fn rewrite_all(&self, entries: Vec<ArchiveEntry>) -> Result<Batch, Error> {
        let guard = self.read()?;
        let trie: &RenameTrie = &guard;

        let start = Instant::now();
        let total = entries.len();
        let out = Mutex::new(Vec::with_capacity(total));
        let failures = Mutex::new(Vec::new());
        let replacements = AtomicUsize::new(0);

        entries.into_par_iter().for_each(|entry| {
            let data = match entry.data {
                Ok(data) => data,
                Err(err) => {
                    log::warn!("archive entry `{}` unreadable: {err}", entry.name);
                    failures.lock().push(Error::EntryUnavailable {
                        name: entry.name,
                        source: err,
                    });
                    return;
                }
            };
            let data = if entry.rewrite {
                let rewritten = rewrite(trie, &data);
                replacements.fetch_add(rewritten.replacements, Ordering::Relaxed);
                rewritten.data
            } else {
                data
            };
            out.lock().push((entry.name, data));
        });

        let batch = Batch {
            entries: out.into_inner(),
            replacements: replacements.into_inner(),
            failures: failures.into_inner(),
        };
        log::info!(
            "rewrote {}/{total} entries, {} replacements, in {:?}",
            batch.entries.len(),
            batch.replacements,
            start.elapsed()
        );
        Ok(batch)
    }

    /// Substring search over a snapshot of the current tree. See
    /// [`SearchResults`] for the yield rule.
    pub fn search(&self, query: &str) -> Result<SearchResults, Error> {
        Ok(SearchResults::over(self.read()?.snapshot(), query))
    }

    /// Number of distinct key sequences in the index.
    pub fn len(&self) -> usize {
        self.trie.read().len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RemapIndex {
    fn default() -> Self {
        Self::new()
    }
}
