use anyhow::Result;
use clap::{Parser, Subcommand};
use file_search::config::{ManagerConfig, ServeConfig, WorkerConfig};
use file_search::context::AppContext;
use file_search::distributed::manager::{self, SearchManager};
use file_search::distributed::pool::WorkerPool;
use file_search::distributed::worker;
use file_search::shutdown::shutdown_signal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Local file search: an index-backed query service plus an indexless distributed mode.
#[derive(Parser)]
#[command(name = "file-search", version, about)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the index-backed search API with its result cache
    Serve(ServeConfig),
    /// Run the distributed search manager (spawns its workers)
    Manager(ManagerConfig),
    /// Run a single filesystem-walking worker
    Worker(WorkerConfig),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Serve(config) => run_serve(config).await,
        Command::Manager(config) => run_manager(config).await,
        Command::Worker(config) => run_worker(config).await,
    }
}

async fn run_serve(config: ServeConfig) -> Result<()> {
    // 1. Shared state:
    let ctx = AppContext::new(config.cache_expiry());

    // 2. Initial indexing:
    for dir in &config.index {
        let indexer = ctx.indexer.clone();
        let dir = dir.clone();
        match tokio::task::spawn_blocking(move || indexer.index_path(&dir)).await? {
            Ok(report) => tracing::info!("Initial index: {} file(s)", report.indexed),
            Err(e) => tracing::error!("Initial index failed: {:#}", e),
        }
    }

    // 3. Cache sweeper:
    if config.sweep_interval_secs > 0 {
        let _sweeper = ctx
            .search
            .cache()
            .clone()
            .spawn_sweeper(Duration::from_secs(config.sweep_interval_secs));
    }

    // 4. HTTP server:
    tracing::info!("Search API listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, ctx.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn run_manager(config: ManagerConfig) -> Result<()> {
    // 1. Worker pool:
    let pool = if config.no_spawn {
        WorkerPool::external(config.workers.clone())
    } else {
        WorkerPool::spawn_current_exe(config.workers.clone())?
    };
    tracing::info!("Worker pool: {:?}", pool.addresses());

    // 2. Manager:
    let search_manager = SearchManager::new(pool.base_urls(), config.worker_timeout());

    // 3. HTTP server:
    tracing::info!("Search manager listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let served = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => axum::serve(listener, manager::router(search_manager))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e.into()),
    };

    // 4. Workers go down with the manager, whatever happened above.
    pool.shutdown().await;

    served
}

async fn run_worker(config: WorkerConfig) -> Result<()> {
    tracing::info!("Worker listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, worker::router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
