//! Manager/Worker Protocol
//!
//! Both roles expose the same endpoint: `GET /api/search?q=<query>&path=<dir>`.
//! The manager treats `path` as a root to partition, a worker as a subtree to walk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENDPOINT_SEARCH: &str = "/api/search";

/// Query string accepted by manager and worker alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub path: Option<String>,
}

/// One file found by a worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkerMatch {
    pub filename: String,
    /// Absolute path on the worker's disk.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification, fractional seconds since the Unix epoch.
    pub modified: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<WorkerMatch>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One directory assigned to one worker for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub worker_address: String,
    pub directory: PathBuf,
}
