use super::cache::CachedSearch;
use super::types::{
    CacheStats, ClearCacheResponse, ErrorResponse, IndexRequest, IndexResponse, SearchResponse,
};
use super::PromptSearch;
use crate::store::indexer::FileIndexer;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(search): Extension<Arc<CachedSearch>>,
) -> Json<SearchResponse> {
    let mut results = search.search_prompt(&params.q).await;
    if let Some(limit) = params.limit {
        results.truncate(limit);
    }

    Json(SearchResponse {
        query: params.q,
        count: results.len(),
        results,
    })
}

pub async fn handle_index(
    Extension(indexer): Extension<Arc<FileIndexer>>,
    Extension(search): Extension<Arc<CachedSearch>>,
    Json(req): Json<IndexRequest>,
) -> Result<Json<IndexResponse>, (StatusCode, Json<ErrorResponse>)> {
    let root = PathBuf::from(&req.path);
    let outcome = tokio::task::spawn_blocking(move || indexer.index_path(&root)).await;

    let report = match outcome {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            tracing::warn!("Failed to index {}: {:#}", req.path, e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            ));
        }
        Err(e) => {
            tracing::error!("Indexing task for {} panicked: {}", req.path, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "indexing task failed".to_string(),
                }),
            ));
        }
    };

    // Result sets carry no provenance, so any re-index drops the whole cache.
    search.invalidate();

    Ok(Json(IndexResponse {
        path: req.path,
        indexed: report.indexed,
        skipped: report.skipped,
    }))
}

pub async fn handle_cache_stats(
    Extension(search): Extension<Arc<CachedSearch>>,
) -> Json<CacheStats> {
    Json(search.stats())
}

pub async fn handle_cache_clear(
    Extension(search): Extension<Arc<CachedSearch>>,
) -> Json<ClearCacheResponse> {
    search.clear();
    Json(ClearCacheResponse {
        success: true,
        message: "Cache cleared".to_string(),
    })
}
