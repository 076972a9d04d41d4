//! Worker Pool
//!
//! Launches the fixed set of worker processes the manager fans out to, and tears them
//! down again when the manager stops. Workers are expected to be listening by the time
//! the first search arrives; there is no readiness probe beyond per-request error handling.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

pub struct WorkerPool {
    addresses: Vec<SocketAddr>,
    children: Mutex<Vec<Child>>,
}

impl WorkerPool {
    /// A pool that does not own any process; used when workers run elsewhere.
    pub fn external(addresses: Vec<SocketAddr>) -> Self {
        Self {
            addresses,
            children: Mutex::new(Vec::new()),
        }
    }

    /// Spawns one `worker --bind <addr>` child of `program` per address.
    ///
    /// Children are killed if the pool is dropped without `shutdown`.
    pub fn spawn(program: PathBuf, addresses: Vec<SocketAddr>) -> Result<Self> {
        let mut children = Vec::with_capacity(addresses.len());

        for addr in &addresses {
            let child = Command::new(&program)
                .arg("worker")
                .arg("--bind")
                .arg(addr.to_string())
                .kill_on_drop(true)
                .spawn()
                .with_context(|| format!("Failed to start worker on {}", addr))?;

            tracing::info!(
                "Started worker on {} (pid {})",
                addr,
                child.id().map(|id| id.to_string()).unwrap_or_else(|| "?".into())
            );
            children.push(child);
        }

        Ok(Self {
            addresses,
            children: Mutex::new(children),
        })
    }

    /// Spawns the pool by re-executing the current binary.
    pub fn spawn_current_exe(addresses: Vec<SocketAddr>) -> Result<Self> {
        let program = std::env::current_exe().context("Cannot locate current executable")?;
        Self::spawn(program, addresses)
    }

    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    /// Base URLs of every worker, in partition order.
    pub fn base_urls(&self) -> Vec<String> {
        self.addresses
            .iter()
            .map(|addr| format!("http://{}", addr))
            .collect()
    }

    pub async fn running(&self) -> usize {
        self.children.lock().await.len()
    }

    /// Terminates every spawned worker and waits for it to exit.
    pub async fn shutdown(&self) {
        let mut children = self.children.lock().await;

        for mut child in children.drain(..) {
            let pid = child.id();
            match child.kill().await {
                Ok(()) => tracing::info!("Terminated worker process {:?}", pid),
                Err(e) => tracing::warn!("Failed to terminate worker process {:?}: {}", pid, e),
            }
        }
    }
}
