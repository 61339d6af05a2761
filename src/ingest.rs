//! Concurrent mapping ingestion.
//!
//! Parses line-oriented mapping sources into key/value pairs and inserts them
//! into one shared [`RenameTrie`]. Sources parse in parallel; the tree itself
//! is not synchronized, so every insertion goes through a caller-supplied
//! sink that takes the lock for exactly one call.
//!
//! Line format is caller-described: a header predicate names the lines to
//! skip, and a delimiter splits data lines into fields. The first field is
//! the key, the second the value; a key equal to its value is stored as an
//! identity mapping. Lines with fewer than two fields are skipped, never an
//! error. A read failure mid-source abandons that source alone and the build
//! reports partial success.

use std::io::BufRead;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::error::Error;
use crate::trie::Mapping;

/// One mapping source, already fetched by the caller.
pub struct Source {
    /// Display name used in logs and failure reports.
    pub name: String,
    /// Line-oriented reader over the source's raw bytes.
    pub reader: Box<dyn BufRead + Send>,
}

impl Source {
    /// Wrap an arbitrary reader.
    pub fn new(name: impl Into<String>, reader: impl BufRead + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// Source backed by in-memory text.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, std::io::Cursor::new(text.into()))
    }
}

/// How to recognize and split mapping lines.
pub struct ParseOptions<'a> {
    /// Field delimiter within a data line.
    pub delimiter: char,
    /// Returns `true` for header or comment lines, which are skipped.
    pub is_header: &'a (dyn Fn(&str) -> bool + Sync),
}

impl<'a> ParseOptions<'a> {
    /// Options with the given delimiter and header predicate.
    pub fn new(delimiter: char, is_header: &'a (dyn Fn(&str) -> bool + Sync)) -> Self {
        Self {
            delimiter,
            is_header,
        }
    }
}

/// Outcome of one ingestion run. Failed sources contribute zero entries but
/// never abort their siblings.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Distinct key sequences present in the tree after the run.
    pub entries: usize,
    /// Data lines successfully parsed and inserted, across all sources.
    pub lines: u64,
    /// Lines skipped as headers or malformed.
    pub skipped: u64,
    /// Per-source failures ([`Error::SourceUnavailable`]).
    pub failures: Vec<Error>,
}

/// Parse all `sources` in parallel, feeding each pair to `insert`.
///
/// `insert` is called once per parsed pair and must provide its own mutual
/// exclusion over the shared tree. `progress` ticks once per inserted pair.
/// The returned report's `entries` is left at zero; the tree's owner fills it
/// in after the run, since only it can read the final count.
pub fn ingest_sources<F>(
    sources: Vec<Source>,
    options: &ParseOptions<'_>,
    insert: F,
    progress: &(dyn Fn() + Sync),
) -> BuildReport
where
    F: Fn(&[u8], Mapping<Vec<u8>>) -> Result<bool, Error> + Sync,
{
    let lines = AtomicU64::new(0);
    let skipped = AtomicU64::new(0);
    let failures = Mutex::new(Vec::new());

    sources.into_par_iter().for_each(|source| {
        let name = source.name.clone();
        if let Err(err) = parse_source(source, options, &insert, progress, &lines, &skipped) {
            log::warn!("mapping source `{name}` failed: {err}");
            failures.lock().push(err);
        }
    });

    BuildReport {
        entries: 0,
        lines: lines.into_inner(),
        skipped: skipped.into_inner(),
        failures: failures.into_inner(),
    }
}

fn parse_source<F>(
    source: Source,
    options: &ParseOptions<'_>,
    insert: &F,
    progress: &(dyn Fn() + Sync),
    lines: &AtomicU64,
    skipped: &AtomicU64,
) -> Result<(), Error>
where
    F: Fn(&[u8], Mapping<Vec<u8>>) -> Result<bool, Error> + Sync,
{
    let Source { name, mut reader } = source;
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(|e| Error::SourceUnavailable {
            name: name.clone(),
            source: e,
        })?;
        if read == 0 {
            return Ok(());
        }
        let text = line.trim_end_matches(['\r', '\n']);
        if text.is_empty() || (options.is_header)(text) {
            skipped.fetch_add(1, Ordering::Relaxed);
            continue;
        }
        let mut fields = text.split(options.delimiter);
        let (key, value) = match (fields.next(), fields.next()) {
            (Some(k), Some(v)) if !k.is_empty() => (k, v),
            _ => {
                log::debug!("skipping malformed line in `{name}`: {text}");
                skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };
        let mapping = if key == value {
            Mapping::Identity
        } else {
            Mapping::Replace(value.as_bytes().to_vec())
        };
        insert(key.as_bytes(), mapping)?;
        lines.fetch_add(1, Ordering::Relaxed);
        progress();
    }
}
