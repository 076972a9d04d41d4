//! Search Manager
//!
//! Front door of distributed mode: partitions a root directory, queries the worker
//! pool in parallel, and merges what comes back.

use super::partitioner::{assign_round_robin, enumerate_work_units};
use super::protocol::{
    ErrorResponse, SearchParams, SearchResponse, WorkUnit, WorkerMatch, ENDPOINT_SEARCH,
};
use crate::error::SearchError;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use uuid::Uuid;

pub struct SearchManager {
    /// Base URLs (`http://host:port`), in partition order.
    workers: Vec<String>,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl SearchManager {
    pub fn new(workers: Vec<String>, timeout: Duration) -> Arc<Self> {
        let workers = workers.into_iter().map(|w| normalize_base_url(&w)).collect();
        Arc::new(Self {
            workers,
            http_client: reqwest::Client::new(),
            timeout,
        })
    }

    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    /// Runs one distributed search.
    ///
    /// # Errors
    /// Only when `root` cannot be listed. Worker failures shrink the result instead.
    pub async fn search(&self, query: &str, root: &Path) -> Result<Vec<WorkerMatch>, SearchError> {
        let request_id = Uuid::new_v4();

        let units = {
            let owned_root = root.to_path_buf();
            tokio::task::spawn_blocking(move || enumerate_work_units(&owned_root))
                .await
                .map_err(|e| SearchError::DirectoryEnumeration {
                    path: root.to_path_buf(),
                    source: std::io::Error::other(e),
                })??
        };

        let assignments = assign_round_robin(&units, &self.workers);
        tracing::info!(
            "[{}] Searching '{}' under {}: {} work unit(s) across {} worker(s)",
            request_id,
            query,
            root.display(),
            units.len(),
            self.workers.len()
        );

        let mut calls = JoinSet::new();
        for worker_units in assignments.into_iter().filter(|u| !u.is_empty()) {
            let client = self.http_client.clone();
            let timeout = self.timeout;
            let query = query.to_string();

            // One in-flight call per worker; its directories go in sequence.
            calls.spawn(async move {
                let mut found = Vec::new();
                for unit in worker_units {
                    match query_worker(&client, &unit, &query, timeout).await {
                        Ok(matches) => found.extend(matches),
                        Err(e) => tracing::warn!("[{}] {}", request_id, e),
                    }
                }
                found
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = calls.join_next().await {
            match joined {
                Ok(matches) => results.extend(matches),
                Err(e) => tracing::error!("[{}] Worker task failed: {}", request_id, e),
            }
        }

        sort_matches(&mut results);
        // The root unit walks every subdirectory again; equal paths are adjacent after sorting.
        results.dedup_by(|a, b| a.path == b.path);
        tracing::info!("[{}] Merged {} result(s)", request_id, results.len());
        Ok(results)
    }
}

async fn query_worker(
    client: &reqwest::Client,
    unit: &WorkUnit,
    query: &str,
    timeout: Duration,
) -> Result<Vec<WorkerMatch>, SearchError> {
    let directory = unit.directory.to_string_lossy();
    let unreachable = |reason: String| SearchError::WorkerUnreachable {
        worker: unit.worker_address.clone(),
        directory: unit.directory.clone(),
        reason,
    };

    let response = client
        .get(format!("{}{}", unit.worker_address, ENDPOINT_SEARCH))
        .query(&[("q", query), ("path", &*directory)])
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| unreachable(e.to_string()))?;

    if !response.status().is_success() {
        return Err(unreachable(format!("status {}", response.status())));
    }

    let body: SearchResponse = response
        .json()
        .await
        .map_err(|e| unreachable(format!("invalid response body: {}", e)))?;

    tracing::debug!(
        "{} returned {} match(es) for {}",
        unit.worker_address,
        body.results.len(),
        directory
    );
    Ok(body.results)
}

/// Filename ascending, ties broken by path.
pub fn sort_matches(matches: &mut [WorkerMatch]) {
    matches.sort_by(|a, b| a.filename.cmp(&b.filename).then_with(|| a.path.cmp(&b.path)));
}

fn normalize_base_url(addr: &str) -> String {
    let trimmed = addr.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    normalized.trim_end_matches('/').to_string()
}

pub fn router(manager: Arc<SearchManager>) -> Router {
    Router::new()
        .route(ENDPOINT_SEARCH, get(handle_manager_search))
        .layer(Extension(manager))
}

pub async fn handle_manager_search(
    Query(params): Query<SearchParams>,
    Extension(manager): Extension<Arc<SearchManager>>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(path) = params.path.filter(|p| !p.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "missing 'path' parameter".to_string(),
            }),
        ));
    };

    match manager.search(&params.q, Path::new(&path)).await {
        Ok(results) => Ok(Json(SearchResponse { results })),
        Err(e) => {
            tracing::warn!("Rejected distributed search: {}", e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}
