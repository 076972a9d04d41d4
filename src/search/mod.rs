//! Search Service Module
//!
//! Answers prompts against the Search Store.
//!
//! ## Overview
//! A prompt flows through three layers:
//! 1. **`cache`**: `CachedSearch` normalizes the prompt and serves repeated queries from memory.
//! 2. **`dispatcher`**: `SearchDispatcher` parses the prompt and decides which strategies to run,
//!    intersecting results across qualifiers (AND semantics).
//! 3. **`registry`**: `StrategyRegistry` maps strategy names to the closures that call the store.
//!
//! Store failures are absorbed at the strategy boundary: they are logged and count as
//! zero matches, so a caller always gets a plain list back.
//!
//! ## Submodules
//! - **`cache`**: Time-expiring result cache and the caching proxy.
//! - **`dispatcher`**: Structured and heuristic query routing.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`registry`**: Runtime-extensible strategy table and the built-in strategies.
//! - **`types`**: Data Transfer Objects (DTOs) for API communication.

pub mod cache;
pub mod dispatcher;
pub mod handlers;
pub mod registry;
pub mod types;

use crate::store::SearchResult;
use async_trait::async_trait;

/// Anything that turns a prompt into results: the dispatcher itself, or a proxy in front of it.
#[async_trait]
pub trait PromptSearch: Send + Sync {
    async fn search_prompt(&self, prompt: &str) -> Vec<SearchResult>;
}
