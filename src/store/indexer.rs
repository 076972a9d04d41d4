//! File Indexer
//!
//! Walks a directory tree and records every regular file in a [`MemoryStore`].
//! Only filesystem metadata is captured; file contents are left to whoever owns
//! content extraction.

use super::memory::{IndexedFile, MemoryStore};

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::Metadata;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    pub skipped: usize,
}

pub struct FileIndexer {
    store: Arc<MemoryStore>,
}

impl FileIndexer {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Recursively indexes `root`. Blocking; run it on a blocking thread from async code.
    ///
    /// # Errors
    /// Fails only when `root` itself is missing or not a directory. Entries that
    /// cannot be read further down are skipped and counted in the report.
    pub fn index_path(&self, root: &Path) -> Result<IndexReport> {
        let root = std::path::absolute(root)
            .with_context(|| format!("Cannot resolve {}", root.display()))?;
        let meta = std::fs::metadata(&root)
            .with_context(|| format!("Cannot access {}", root.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("{} is not a directory", root.display());
        }

        tracing::info!("Indexing path: {}", root.display());
        let mut report = IndexReport::default();

        for entry in WalkDir::new(&root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    report.skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                    report.skipped += 1;
                    continue;
                }
            };

            let path = entry.path();
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();

            self.store.upsert(IndexedFile {
                path: path.to_string_lossy().into_owned(),
                filename: entry.file_name().to_string_lossy().into_owned(),
                extension,
                size: metadata.len(),
                modified: modified_secs(&metadata),
                content: None,
            });
            report.indexed += 1;
        }

        tracing::info!(
            "Indexed {} file(s) under {} ({} skipped)",
            report.indexed,
            root.display(),
            report.skipped
        );
        Ok(report)
    }
}

/// Last-modified time as fractional seconds since the Unix epoch, 0 when unknown.
pub fn modified_secs(metadata: &Metadata) -> f64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
