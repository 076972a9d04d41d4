//! Application Context
//!
//! Everything the index-backed service shares, built once at startup and handed to
//! the router. Nothing here is a process-wide static.

use crate::search::cache::CachedSearch;
use crate::search::dispatcher::SearchDispatcher;
use crate::search::handlers::{handle_cache_clear, handle_cache_stats, handle_index, handle_search};
use crate::search::registry::StrategyRegistry;
use crate::search::types::{
    ENDPOINT_CACHE_CLEAR, ENDPOINT_CACHE_STATS, ENDPOINT_INDEX, ENDPOINT_SEARCH,
};
use crate::store::indexer::FileIndexer;
use crate::store::memory::MemoryStore;

use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;
use std::time::Duration;

pub struct AppContext {
    pub indexer: Arc<FileIndexer>,
    pub search: Arc<CachedSearch>,
}

impl AppContext {
    pub fn new(cache_expiry: Duration) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), cache_expiry)
    }

    pub fn with_store(store: Arc<MemoryStore>, cache_expiry: Duration) -> Self {
        let indexer = Arc::new(FileIndexer::new(store.clone()));
        let dispatcher = Arc::new(SearchDispatcher::new(store, StrategyRegistry::with_builtin()));
        let search = Arc::new(CachedSearch::new(dispatcher, cache_expiry));

        Self { indexer, search }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(ENDPOINT_SEARCH, get(handle_search))
            .route(ENDPOINT_INDEX, post(handle_index))
            .route(ENDPOINT_CACHE_STATS, get(handle_cache_stats))
            .route(ENDPOINT_CACHE_CLEAR, post(handle_cache_clear))
            .layer(Extension(self.indexer.clone()))
            .layer(Extension(self.search.clone()))
    }
}
