//! Runtime Configuration
//!
//! Command-line arguments for the three roles of the binary. Every option can also be
//! supplied through the environment variable named next to it.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Addresses of the default three-worker pool.
pub const DEFAULT_WORKER_ADDRS: [&str; 3] = ["127.0.0.1:5002", "127.0.0.1:5003", "127.0.0.1:5004"];

/// Index-backed search service.
#[derive(Debug, Clone, Args)]
pub struct ServeConfig {
    /// Address the HTTP API binds to
    #[arg(long, env = "FILE_SEARCH_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Directories to index at startup (repeatable or comma separated)
    #[arg(long = "index", value_name = "DIR", env = "FILE_SEARCH_INDEX", value_delimiter = ',')]
    pub index: Vec<PathBuf>,

    /// Seconds a cached result set stays fresh
    #[arg(long, env = "FILE_SEARCH_CACHE_EXPIRY_SECS", default_value_t = 600)]
    pub cache_expiry_secs: u64,

    /// Seconds between background purges of expired cache entries (0 disables)
    #[arg(long, env = "FILE_SEARCH_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,
}

impl ServeConfig {
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_secs)
    }
}

/// Distributed indexless search manager.
#[derive(Debug, Clone, Args)]
pub struct ManagerConfig {
    #[arg(long, env = "FILE_SEARCH_MANAGER_BIND", default_value = "127.0.0.1:5001")]
    pub bind: SocketAddr,

    /// Worker addresses, in partition order (repeatable or comma separated)
    #[arg(
        long = "worker",
        value_name = "ADDR",
        env = "FILE_SEARCH_WORKERS",
        value_delimiter = ',',
        default_values = DEFAULT_WORKER_ADDRS
    )]
    pub workers: Vec<SocketAddr>,

    /// Per-call timeout for worker requests, in seconds
    #[arg(long, env = "FILE_SEARCH_WORKER_TIMEOUT_SECS", default_value_t = 30)]
    pub worker_timeout_secs: u64,

    /// Do not launch worker processes; expect them to be running already
    #[arg(long, env = "FILE_SEARCH_NO_SPAWN")]
    pub no_spawn: bool,
}

impl ManagerConfig {
    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_secs)
    }
}

/// Stateless filesystem-walking worker.
#[derive(Debug, Clone, Args)]
pub struct WorkerConfig {
    #[arg(long, env = "FILE_SEARCH_WORKER_BIND", default_value = "127.0.0.1:5002")]
    pub bind: SocketAddr,
}
