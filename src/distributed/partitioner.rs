use super::protocol::WorkUnit;
use crate::error::SearchError;

use std::path::{Path, PathBuf};

/// Lists the work units for `root`: its immediate subdirectories, sorted by name,
/// followed by `root` itself so files directly inside it are covered too.
pub fn enumerate_work_units(root: &Path) -> Result<Vec<PathBuf>, SearchError> {
    let to_error = |source| SearchError::DirectoryEnumeration {
        path: root.to_path_buf(),
        source,
    };

    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(to_error)? {
        let entry = entry.map_err(to_error)?;
        // Follows symlinks, like a plain `is_dir` check on the joined path.
        if entry.path().is_dir() {
            subdirs.push(entry.path());
        }
    }
    subdirs.sort();
    subdirs.push(root.to_path_buf());

    Ok(subdirs)
}

/// Round-robin assignment: unit `i` goes to worker `i % workers.len()`.
///
/// The outer vector is indexed like `workers`; workers with nothing to do get an
/// empty list. Balances by count, not by subtree size.
pub fn assign_round_robin(units: &[PathBuf], workers: &[String]) -> Vec<Vec<WorkUnit>> {
    let mut assignments: Vec<Vec<WorkUnit>> = vec![Vec::new(); workers.len()];
    if workers.is_empty() {
        return assignments;
    }

    for (i, directory) in units.iter().enumerate() {
        let worker_idx = i % workers.len();
        assignments[worker_idx].push(WorkUnit {
            worker_address: workers[worker_idx].clone(),
            directory: directory.clone(),
        });
    }

    assignments
}
