//! Search Store Module
//!
//! The Search Store owns the persistent file index and answers the five primitive
//! lookups the dispatcher composes queries from. Its ranking and storage internals
//! are not the engine's business; the engine only relies on the contract below.
//!
//! ## Submodules
//! - **`memory`**: An in-memory store keyed by absolute path, used by the `serve` binary and tests.
//! - **`indexer`**: Walks a directory tree and feeds file records into the memory store.

pub mod indexer;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single matching file. `path` is the identity key for set operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SearchResult {
    pub filename: String,
    pub path: String,
}

impl SearchResult {
    pub fn new(filename: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }
}

/// Read side of the file index.
///
/// Path matching is expected to be case-insensitive and separator-normalized
/// (`\` and `/` are the same), with the mode picked from the pattern's shape:
/// absolute prefix, substring, or path-segment match for bare names.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// `extension` comes without the leading dot.
    async fn search_by_extension(&self, extension: &str) -> Result<Vec<SearchResult>>;

    async fn search_by_content(&self, term: &str) -> Result<Vec<SearchResult>>;

    async fn search_by_multiple_words(&self, words: &[String]) -> Result<Vec<SearchResult>>;

    async fn search_by_path(&self, pattern: &str) -> Result<Vec<SearchResult>>;

    async fn search_by_path_and_content(
        &self,
        pattern: &str,
        content: &str,
    ) -> Result<Vec<SearchResult>>;
}
