//! Error taxonomy.
//!
//! Malformed mapping lines are not errors; they are skipped and logged by the
//! ingestion loop. Identity matches are values, not failures.

use std::io;

use thiserror::Error;

/// Errors surfaced by the index and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// An empty key sequence was offered to insertion. Fatal to that call only.
    #[error("empty key sequence")]
    EmptyKey,

    /// A read was issued while an index rebuild was in progress.
    #[error("index rebuild in progress")]
    Rebuilding,

    /// One mapping source failed to arrive or read. Sibling sources are
    /// unaffected; the build reports partial success.
    #[error("mapping source `{name}` unavailable")]
    SourceUnavailable {
        /// Display name of the failed source.
        name: String,
        /// Underlying read failure.
        #[source]
        source: io::Error,
    },

    /// One archive entry's bytes could not be read. The rest of the batch is
    /// unaffected.
    #[error("archive entry `{name}` unavailable")]
    EntryUnavailable {
        /// Entry path within the archive.
        name: String,
        /// Underlying read failure.
        #[source]
        source: io::Error,
    },
}
