use crate::store::SearchResult;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_SEARCH: &str = "/api/search";
pub const ENDPOINT_INDEX: &str = "/api/index";
pub const ENDPOINT_CACHE_STATS: &str = "/cache/stats";
pub const ENDPOINT_CACHE_CLEAR: &str = "/cache/clear";

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexRequest {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub path: String,
    pub indexed: usize,
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Snapshot of the cache, as reported by `GET /cache/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub active_entries: usize,
    /// Expired but not yet evicted.
    pub expired_entries: usize,
    pub memory_usage_estimate: String,
    pub hits: u64,
    pub misses: u64,
}
