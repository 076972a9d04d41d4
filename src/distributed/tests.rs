//! Distributed Module Tests
//!
//! Exercises partitioning, the worker's filename walk, and the manager's fan-out
//! against real in-process worker servers.
//!
//! ## Test Scopes
//! - **Partitioner**: work-unit enumeration and round-robin assignment.
//! - **Worker**: recursive case-insensitive filename matching and its HTTP handler.
//! - **Manager**: parallel fan-out, partial failure, timeouts, merge ordering.
//! - **Pool**: address bookkeeping and child process lifecycle.

#[cfg(test)]
mod tests {
    use crate::distributed::manager::{router as manager_router, sort_matches, SearchManager};
    use crate::distributed::partitioner::{assign_round_robin, enumerate_work_units};
    use crate::distributed::pool::WorkerPool;
    use crate::distributed::protocol::{ErrorResponse, SearchResponse, WorkerMatch, ENDPOINT_SEARCH};
    use crate::distributed::worker::{router as worker_router, search_files};
    use crate::error::SearchError;

    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::fs;
    use std::net::SocketAddr;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use tokio::net::TcpListener;

    // ============================================================
    // FIXTURES
    // ============================================================

    async fn spawn_server(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    /// An address nothing listens on.
    fn dead_address() -> SocketAddr {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// Root with subdirectories `a`..`f`, one matching report in each, plus one at the root.
    fn six_dir_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in ["a", "b", "c", "d", "e", "f"] {
            write(dir.path(), &format!("{}/report_{}.txt", name, name), name);
            write(dir.path(), &format!("{}/notes.md", name), "not a match");
        }
        write(dir.path(), "report_root.txt", "root");
        dir
    }

    fn count_by_filename(matches: &[WorkerMatch]) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for m in matches {
            *counts.entry(m.filename.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn is_sorted(matches: &[WorkerMatch]) -> bool {
        matches.windows(2).all(|pair| {
            (&pair[0].filename, &pair[0].path) <= (&pair[1].filename, &pair[1].path)
        })
    }

    fn worker_match(filename: &str, path: &str) -> WorkerMatch {
        WorkerMatch {
            filename: filename.to_string(),
            path: path.to_string(),
            size: 0,
            modified: 0.0,
        }
    }

    // ============================================================
    // PARTITIONER
    // ============================================================

    #[test]
    fn test_round_robin_seven_units_three_workers() {
        let units: Vec<PathBuf> = (0..7).map(|i| PathBuf::from(format!("/u{}", i))).collect();
        let workers = vec!["w0".to_string(), "w1".to_string(), "w2".to_string()];

        let assignments = assign_round_robin(&units, &workers);

        let dirs = |idx: usize| -> Vec<PathBuf> {
            assignments[idx].iter().map(|u| u.directory.clone()).collect()
        };
        assert_eq!(assignments.len(), 3);
        assert_eq!(dirs(0), vec![units[0].clone(), units[3].clone(), units[6].clone()]);
        assert_eq!(dirs(1), vec![units[1].clone(), units[4].clone()]);
        assert_eq!(dirs(2), vec![units[2].clone(), units[5].clone()]);
        assert!(assignments[1].iter().all(|u| u.worker_address == "w1"));
    }

    #[test]
    fn test_round_robin_more_workers_than_units() {
        let units = vec![PathBuf::from("/only")];
        let workers = vec!["w0".to_string(), "w1".to_string()];

        let assignments = assign_round_robin(&units, &workers);

        assert_eq!(assignments[0].len(), 1);
        assert!(assignments[1].is_empty());
    }

    #[test]
    fn test_round_robin_without_workers() {
        let units = vec![PathBuf::from("/a")];
        assert!(assign_round_robin(&units, &[]).is_empty());
    }

    #[test]
    fn test_enumerate_sorted_subdirs_then_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("loose.txt"), "x").unwrap();

        let units = enumerate_work_units(dir.path()).unwrap();

        assert_eq!(
            units,
            vec![
                dir.path().join("alpha"),
                dir.path().join("zeta"),
                dir.path().to_path_buf()
            ]
        );
    }

    #[test]
    fn test_enumerate_empty_root_is_one_unit() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            enumerate_work_units(dir.path()).unwrap(),
            vec![dir.path().to_path_buf()]
        );
    }

    #[test]
    fn test_enumerate_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let err = enumerate_work_units(&missing).unwrap_err();

        assert!(matches!(err, SearchError::DirectoryEnumeration { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_enumerate_file_root_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        assert!(enumerate_work_units(&file).is_err());
    }

    // ============================================================
    // WORKER
    // ============================================================

    #[test]
    fn test_search_files_case_insensitive_and_recursive() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Budget_2024.XLSX", "12345");
        write(dir.path(), "deep/er/still/budget.txt", "abc");
        write(dir.path(), "deep/unrelated.txt", "abc");

        let mut matches = search_files("BUDGET", dir.path());
        sort_matches(&mut matches);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].filename, "Budget_2024.XLSX");
        assert_eq!(matches[0].size, 5);
        assert_eq!(matches[1].filename, "budget.txt");
        assert!(Path::new(&matches[1].path).is_absolute());
        assert!(matches[1].path.ends_with("budget.txt"));
        assert!(matches[1].modified > 0.0);
    }

    #[test]
    fn test_search_files_ignores_directory_names() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "invoices/january.pdf", "x");

        assert!(search_files("invoices", dir.path()).is_empty());
    }

    #[test]
    fn test_search_files_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(search_files("x", &dir.path().join("gone")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_search_files_skips_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        // ARRANGE
        let dir = TempDir::new().unwrap();
        write(dir.path(), "open/report_open.txt", "x");
        write(dir.path(), "locked/report_locked.txt", "x");
        write(dir.path(), "report_top.txt", "x");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind root
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        // ACT
        let mut matches = search_files("report", dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        sort_matches(&mut matches);

        // ASSERT
        let names: Vec<&str> = matches.iter().map(|m| m.filename.as_str()).collect();
        assert_eq!(names, vec!["report_open.txt", "report_top.txt"]);
    }

    #[tokio::test]
    async fn test_worker_http_search() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sub/photo.JPG", "img");
        let addr = spawn_server(worker_router()).await;

        let response: SearchResponse = reqwest::Client::new()
            .get(format!("http://{}{}", addr, ENDPOINT_SEARCH))
            .query(&[("q", "photo"), ("path", &*dir.path().to_string_lossy())])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].filename, "photo.JPG");
    }

    #[tokio::test]
    async fn test_worker_http_requires_path() {
        let addr = spawn_server(worker_router()).await;

        let response = reqwest::Client::new()
            .get(format!("http://{}{}", addr, ENDPOINT_SEARCH))
            .query(&[("q", "photo")])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    // ============================================================
    // MANAGER
    // ============================================================

    #[tokio::test]
    async fn test_fan_out_survives_failed_worker() {
        // ARRANGE: units a..f plus root; W1 (b, e) is down
        let tree = six_dir_tree();
        let w0 = spawn_server(worker_router()).await;
        let w1 = dead_address();
        let w2 = spawn_server(worker_router()).await;
        let manager = SearchManager::new(
            vec![w0.to_string(), w1.to_string(), w2.to_string()],
            Duration::from_secs(5),
        );

        // ACT
        let results = manager.search("REPORT", tree.path()).await.unwrap();

        // ASSERT: the root unit (W0) still covers b and e, each path exactly once
        let counts = count_by_filename(&results);
        for name in ["a", "b", "c", "d", "e", "f", "root"] {
            assert_eq!(counts[&format!("report_{}.txt", name)], 1, "report_{}", name);
        }
        assert_eq!(results.len(), 7);
        assert!(!counts.contains_key("notes.md"));
        assert!(is_sorted(&results));
    }

    #[tokio::test]
    async fn test_merged_paths_are_unique() {
        // ARRANGE: every unit answered, so each subdirectory is walked twice
        let tree = six_dir_tree();
        let w0 = spawn_server(worker_router()).await;
        let w1 = spawn_server(worker_router()).await;
        let w2 = spawn_server(worker_router()).await;
        let manager = SearchManager::new(
            vec![w0.to_string(), w1.to_string(), w2.to_string()],
            Duration::from_secs(5),
        );

        // ACT
        let results = manager.search("report", tree.path()).await.unwrap();

        // ASSERT
        let unique: std::collections::HashSet<&str> =
            results.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(unique.len(), results.len());
        assert_eq!(results.len(), 7);
        assert!(is_sorted(&results));
    }

    #[tokio::test]
    async fn test_fan_out_loses_units_of_failed_root_owner() {
        let tree = six_dir_tree();
        let w0 = dead_address();
        let w1 = spawn_server(worker_router()).await;
        let w2 = spawn_server(worker_router()).await;
        let manager = SearchManager::new(
            vec![w0.to_string(), w1.to_string(), w2.to_string()],
            Duration::from_secs(5),
        );

        let results = manager.search("report", tree.path()).await.unwrap();

        let names: Vec<&str> = results.iter().map(|m| m.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["report_b.txt", "report_c.txt", "report_e.txt", "report_f.txt"]
        );
    }

    #[tokio::test]
    async fn test_all_workers_down_returns_empty() {
        let tree = six_dir_tree();
        let manager = SearchManager::new(
            vec![dead_address().to_string(), dead_address().to_string()],
            Duration::from_secs(2),
        );

        let results = manager.search("report", tree.path()).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_slow_worker_times_out() {
        // ARRANGE: units [a, root]; the slow worker owns root
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/log_a.txt", "x");
        write(dir.path(), "log_root.txt", "x");

        let fast = spawn_server(worker_router()).await;
        let slow = spawn_server(Router::new().route(
            ENDPOINT_SEARCH,
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(SearchResponse::default())
            }),
        ))
        .await;
        let manager = SearchManager::new(
            vec![fast.to_string(), slow.to_string()],
            Duration::from_millis(300),
        );

        // ACT
        let started = Instant::now();
        let results = manager.search("log", dir.path()).await.unwrap();

        // ASSERT
        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "log_a.txt");
    }

    #[tokio::test]
    async fn test_worker_error_status_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/hit.txt", "x");

        let good = spawn_server(worker_router()).await;
        let broken = spawn_server(Router::new().route(
            ENDPOINT_SEARCH,
            get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let manager = SearchManager::new(
            vec![good.to_string(), broken.to_string()],
            Duration::from_secs(5),
        );

        let results = manager.search("hit", dir.path()).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].path.ends_with("hit.txt"));
    }

    #[tokio::test]
    async fn test_manager_rejects_missing_root() {
        let manager = SearchManager::new(vec![dead_address().to_string()], Duration::from_secs(1));
        let missing = TempDir::new().unwrap().path().join("nope");

        let err = manager.search("x", &missing).await.unwrap_err();

        assert!(matches!(err, SearchError::DirectoryEnumeration { .. }));
    }

    #[tokio::test]
    async fn test_manager_http_bad_root_is_client_error() {
        let manager = SearchManager::new(vec![dead_address().to_string()], Duration::from_secs(1));
        let addr = spawn_server(manager_router(manager)).await;
        let missing = TempDir::new().unwrap().path().join("nope");

        let response = reqwest::Client::new()
            .get(format!("http://{}{}", addr, ENDPOINT_SEARCH))
            .query(&[("q", "x"), ("path", &*missing.to_string_lossy())])
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json().await.unwrap();
        assert!(body.error.contains("Error reading directory"));
    }

    #[tokio::test]
    async fn test_manager_http_end_to_end() {
        let tree = six_dir_tree();
        let w0 = spawn_server(worker_router()).await;
        let w1 = spawn_server(worker_router()).await;
        let manager = SearchManager::new(
            vec![format!("http://{}/", w0), w1.to_string()],
            Duration::from_secs(5),
        );
        let addr = spawn_server(manager_router(manager)).await;

        let response: SearchResponse = reqwest::Client::new()
            .get(format!("http://{}{}", addr, ENDPOINT_SEARCH))
            .query(&[("q", "report_root"), ("path", &*tree.path().to_string_lossy())])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].filename, "report_root.txt");
    }

    #[test]
    fn test_manager_normalizes_worker_addresses() {
        let manager = SearchManager::new(
            vec!["127.0.0.1:5002".into(), "http://127.0.0.1:5003/".into()],
            Duration::from_secs(1),
        );
        assert_eq!(
            manager.workers(),
            &["http://127.0.0.1:5002".to_string(), "http://127.0.0.1:5003".to_string()]
        );
    }

    #[test]
    fn test_sort_matches_breaks_ties_by_path() {
        let mut matches = vec![
            worker_match("b.txt", "/z/b.txt"),
            worker_match("a.txt", "/y/a.txt"),
            worker_match("a.txt", "/x/a.txt"),
        ];

        sort_matches(&mut matches);

        let paths: Vec<&str> = matches.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["/x/a.txt", "/y/a.txt", "/z/b.txt"]);
    }

    // ============================================================
    // POOL
    // ============================================================

    #[tokio::test]
    async fn test_external_pool_owns_no_processes() {
        let addrs: Vec<SocketAddr> = vec!["127.0.0.1:5002".parse().unwrap()];
        let pool = WorkerPool::external(addrs.clone());

        assert_eq!(pool.addresses(), addrs.as_slice());
        assert_eq!(pool.base_urls(), vec!["http://127.0.0.1:5002".to_string()]);
        assert_eq!(pool.running().await, 0);
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_spawn_unknown_program_fails() {
        let result = WorkerPool::spawn(
            PathBuf::from("/definitely/not/a/real/binary"),
            vec!["127.0.0.1:5002".parse().unwrap()],
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_spawned_children_are_terminated() {
        // `sh` chokes on the worker arguments and exits; the pool still tracks and reaps it.
        let program = PathBuf::from("sh");

        let pool = WorkerPool::spawn(
            program,
            vec!["127.0.0.1:5002".parse().unwrap(), "127.0.0.1:5003".parse().unwrap()],
        )
        .unwrap();
        assert_eq!(pool.running().await, 2);

        pool.shutdown().await;

        assert_eq!(pool.running().await, 0);
    }
}
