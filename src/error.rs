//! Error Kinds
//!
//! Boundary errors of the search engine. Most failures below the dispatcher and
//! manager are absorbed (logged, degraded to zero matches); the variants here are
//! the ones that get named in logs or surfaced to a caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// A qualifier the dispatcher does not know how to serve. Never fatal.
    #[error("unsupported qualifier '{0}'")]
    UnsupportedQualifier(String),

    /// No strategy is registered under the requested name.
    #[error("unknown search strategy '{0}'")]
    UnknownStrategy(String),

    /// A Search Store call failed. Treated as zero matches for that sub-query.
    #[error("strategy '{strategy}' failed: {reason}")]
    StoreFailure { strategy: String, reason: String },

    /// The root of a distributed search could not be listed.
    #[error("Error reading directory {}: {source}", path.display())]
    DirectoryEnumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A worker call failed, timed out or returned garbage.
    #[error("worker {worker} failed for {}: {reason}", directory.display())]
    WorkerUnreachable {
        worker: String,
        directory: PathBuf,
        reason: String,
    },
}
