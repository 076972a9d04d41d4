use super::protocol::{ErrorResponse, SearchParams, SearchResponse, WorkerMatch, ENDPOINT_SEARCH};
use crate::store::indexer::modified_secs;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn router() -> Router {
    Router::new().route(ENDPOINT_SEARCH, get(handle_worker_search))
}

/// Walks `root` recursively and returns every regular file whose name contains
/// `query`, ignoring case. Blocking.
///
/// Unreadable directories and files are logged and skipped; the rest of the walk
/// continues.
pub fn search_files(query: &str, root: &Path) -> Vec<WorkerMatch> {
    let needle = query.to_lowercase();
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let mut matches = Vec::new();

    for entry in WalkDir::new(&root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy();
        if !filename.to_lowercase().contains(&needle) {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => matches.push(WorkerMatch {
                filename: filename.into_owned(),
                path: entry.path().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: modified_secs(&metadata),
            }),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
            }
        }
    }

    matches
}

pub async fn handle_worker_search(
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(path) = params.path.filter(|p| !p.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "missing 'path' parameter".to_string(),
            }),
        ));
    };

    let root = PathBuf::from(&path);
    let query = params.q;
    tracing::debug!("Worker searching '{}' under {}", query, path);

    let results = match tokio::task::spawn_blocking(move || search_files(&query, &root)).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Search task for {} failed: {}", path, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "search task failed".to_string(),
                }),
            ));
        }
    };

    tracing::debug!("Worker found {} match(es) under {}", results.len(), path);
    Ok(Json(SearchResponse { results }))
}
