//! Search Result Cache
//!
//! Memoizes prompt results with a fixed time-to-live.
//!
//! ## Rules
//! - Keys are prompts trimmed and lower-cased, so `"Foo "` and `"foo"` share an entry.
//! - An entry is stale once `now - inserted_at >= expiry`. Stale entries are evicted
//!   lazily on lookup, or in bulk by `purge_expired` / the background sweeper.
//! - Entries are replaced wholesale on `set`, never mutated.
//! - The cache has no idea which files a result set came from, so any change to the
//!   index must invalidate all of it.

use super::types::CacheStats;
use super::PromptSearch;
use crate::store::SearchResult;

use async_trait::async_trait;
use dashmap::DashMap;
use std::mem::size_of;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_EXPIRY: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<SearchResult>,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, expiry: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= expiry
    }

    fn estimated_bytes(&self) -> usize {
        size_of::<Self>()
            + self.results.capacity() * size_of::<SearchResult>()
            + self
                .results
                .iter()
                .map(|r| r.filename.capacity() + r.path.capacity())
                .sum::<usize>()
    }
}

pub fn normalize_key(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

pub struct SearchCache {
    entries: DashMap<String, CacheEntry>,
    expiry: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SearchCache {
    pub fn new(expiry: Duration) -> Self {
        tracing::info!("Search cache initialized with expiry time: {:?}", expiry);
        Self {
            entries: DashMap::new(),
            expiry,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached results for `key` if present and still fresh.
    pub fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(self.expiry, now) {
                tracing::debug!("Cache hit for query: '{}'", key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.results.clone());
            }
        }

        // Guard released above; only drop the entry if it is still the stale one.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(self.expiry, now))
            .is_some()
        {
            tracing::debug!("Cache expired for query: '{}'", key);
        }

        tracing::debug!("Cache miss for query: '{}'", key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn set(&self, key: &str, results: Vec<SearchResult>) {
        let count = results.len();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                results,
                inserted_at: Instant::now(),
            },
        );
        tracing::debug!("Cached results for query: '{}' ({} results)", key, count);
    }

    pub fn clear(&self) {
        self.entries.clear();
        tracing::info!("Cache cleared");
    }

    /// Drops every stale entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired(self.expiry, now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let mut total = 0;
        let mut active = 0;
        let mut bytes = size_of::<Self>();

        for entry in self.entries.iter() {
            total += 1;
            if !entry.value().is_expired(self.expiry, now) {
                active += 1;
            }
            bytes += entry.key().capacity() + entry.value().estimated_bytes();
        }

        CacheStats {
            total_entries: total,
            active_entries: active,
            expired_entries: total - active,
            memory_usage_estimate: format_bytes(bytes),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Spawns a background task that purges stale entries every `interval`.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let purged = self.purge_expired();
                if purged > 0 {
                    tracing::debug!("Cache sweeper purged {} expired entries", purged);
                }
            }
        })
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_EXPIRY)
    }
}

fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Caching proxy with the same contract as the dispatcher it wraps.
pub struct CachedSearch {
    inner: Arc<dyn PromptSearch>,
    cache: Arc<SearchCache>,
}

impl CachedSearch {
    pub fn new(inner: Arc<dyn PromptSearch>, expiry: Duration) -> Self {
        Self::with_cache(inner, Arc::new(SearchCache::new(expiry)))
    }

    pub fn with_cache(inner: Arc<dyn PromptSearch>, cache: Arc<SearchCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<SearchCache> {
        &self.cache
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops everything. Call after any change to the underlying index.
    pub fn invalidate(&self) {
        tracing::info!("Invalidating search cache due to file system changes");
        self.cache.clear();
    }
}

#[async_trait]
impl PromptSearch for CachedSearch {
    async fn search_prompt(&self, prompt: &str) -> Vec<SearchResult> {
        if prompt.trim().is_empty() {
            tracing::info!("Empty search prompt, returning empty results");
            return vec![];
        }

        let key = normalize_key(prompt);
        if let Some(results) = self.cache.get(&key) {
            tracing::info!("Returning cached results for query: '{}'", prompt);
            return results;
        }

        tracing::info!("Cache miss for query: '{}', forwarding to dispatcher", prompt);
        let results = self.inner.search_prompt(prompt).await;

        // Empty results are not cached so they cannot hide files indexed later.
        if !results.is_empty() {
            self.cache.set(&key, results.clone());
        }

        results
    }
}
