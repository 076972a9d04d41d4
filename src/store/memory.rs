use super::{SearchResult, SearchStore};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Everything the index knows about one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedFile {
    pub path: String,
    pub filename: String,
    /// Lower-cased, without the leading dot. Empty for files without one.
    pub extension: String,
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub modified: f64,
    pub content: Option<String>,
}

impl IndexedFile {
    fn to_result(&self) -> SearchResult {
        SearchResult::new(self.filename.clone(), self.path.clone())
    }

    fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }
}

/// In-memory Search Store keyed by absolute path.
///
/// Re-inserting a path replaces the previous record wholesale.
pub struct MemoryStore {
    files: DashMap<String, IndexedFile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    pub fn upsert(&self, file: IndexedFile) {
        self.files.insert(file.path.clone(), file);
    }

    pub fn get(&self, path: &str) -> Option<IndexedFile> {
        self.files.get(path).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn collect<F>(&self, predicate: F) -> Vec<IndexedFile>
    where
        F: Fn(&IndexedFile) -> bool,
    {
        self.files
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn path_matches(&self, pattern: &str) -> Vec<IndexedFile> {
        let matcher = PathPattern::new(pattern);
        let mut files = self.collect(|file| matcher.matches(&file.normalized_path()));
        files.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.filename.cmp(&b.filename)));
        files
    }

    fn content_matches(&self, term: &str) -> Vec<IndexedFile> {
        let needle = term.to_lowercase();
        let mut files = self.collect(|file| {
            contains_ci(&file.filename, &needle)
                || contains_ci(&file.path, &needle)
                || file
                    .content
                    .as_deref()
                    .is_some_and(|content| contains_ci(content, &needle))
        });
        // Filename hits rank first
        files.sort_by(|a, b| {
            let a_rank = Reverse(contains_ci(&a.filename, &needle));
            let b_rank = Reverse(contains_ci(&b.filename, &needle));
            a_rank.cmp(&b_rank).then_with(|| a.path.cmp(&b.path))
        });
        files
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn search_by_extension(&self, extension: &str) -> Result<Vec<SearchResult>> {
        let wanted = extension.trim_start_matches('.').to_lowercase();
        let mut files = self.collect(|file| file.extension == wanted);
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files.iter().map(IndexedFile::to_result).collect())
    }

    async fn search_by_content(&self, term: &str) -> Result<Vec<SearchResult>> {
        if term.trim().is_empty() {
            return Ok(vec![]);
        }
        Ok(self
            .content_matches(term)
            .iter()
            .map(IndexedFile::to_result)
            .collect())
    }

    async fn search_by_multiple_words(&self, words: &[String]) -> Result<Vec<SearchResult>> {
        if words.is_empty() {
            return Ok(vec![]);
        }
        let needles: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let mut files = self.collect(|file| {
            needles.iter().all(|needle| {
                contains_ci(&file.filename, needle)
                    || file
                        .content
                        .as_deref()
                        .is_some_and(|content| contains_ci(content, needle))
            })
        });
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files.iter().map(IndexedFile::to_result).collect())
    }

    async fn search_by_path(&self, pattern: &str) -> Result<Vec<SearchResult>> {
        Ok(self
            .path_matches(pattern)
            .iter()
            .map(IndexedFile::to_result)
            .collect())
    }

    async fn search_by_path_and_content(
        &self,
        pattern: &str,
        content: &str,
    ) -> Result<Vec<SearchResult>> {
        let in_path = self.path_matches(pattern);
        if in_path.is_empty() {
            return Ok(vec![]);
        }

        let needle = content.to_lowercase();
        let mut files: Vec<IndexedFile> = in_path
            .into_iter()
            .filter(|file| {
                contains_ci(&file.filename, &needle)
                    || contains_ci(&file.path, &needle)
                    || file
                        .content
                        .as_deref()
                        .is_some_and(|text| contains_ci(text, &needle))
            })
            .collect();
        files.sort_by(|a, b| a.filename.cmp(&b.filename).then_with(|| a.path.cmp(&b.path)));
        Ok(files.iter().map(IndexedFile::to_result).collect())
    }
}

/// `needle` must already be lower-cased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// How a path pattern is matched against normalized stored paths.
#[derive(Debug, PartialEq, Eq)]
enum PathPattern {
    Prefix(String),
    Substring(String),
    Segment(String),
}

impl PathPattern {
    fn new(pattern: &str) -> Self {
        let normalized = normalize_path(pattern);
        if normalized.starts_with('/') || has_drive_prefix(&normalized) {
            PathPattern::Prefix(normalized)
        } else if normalized.contains('/') {
            PathPattern::Substring(normalized)
        } else {
            PathPattern::Segment(format!("/{}", normalized))
        }
    }

    fn matches(&self, normalized_path: &str) -> bool {
        match self {
            PathPattern::Prefix(prefix) => normalized_path.starts_with(prefix.as_str()),
            PathPattern::Substring(needle) | PathPattern::Segment(needle) => {
                normalized_path.contains(needle.as_str())
            }
        }
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}
