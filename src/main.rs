//! Registry Proxy - A caching read-through proxy for npm registry metadata
//!
//! Serves package metadata documents from a key-value store, fetching
//! from the upstream registry on a miss and rewriting tarball URLs to
//! point back at the proxy.

mod api;
mod config;
mod error;
mod models;
mod proxy;
mod store;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::{Config, StoreBackend};
use proxy::Proxy;
use store::{MemoryStore, RedisStore, Store};
use tasks::spawn_cleanup_task;

/// How often the memory backend sweeps expired entries, in seconds.
const SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Parser)]
#[command(
    name = "registry-proxy",
    version,
    about = "Caching read-through proxy for npm registry metadata"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the proxy HTTP server (the default)
    Serve,
    /// Print every cached package path
    List,
    /// Purge all cached packages
    Purge,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registry_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::List => list(config).await,
        Command::Purge => purge(config).await,
    }
}

/// Runs the HTTP proxy server until a shutdown signal arrives.
async fn serve(config: Config) -> Result<()> {
    info!("Starting registry proxy");
    info!(
        "Configuration loaded: upstream={}, prefix={}, ttl={}s, port={}",
        config.upstream_url, config.key_prefix, config.cache_ttl, config.server_port
    );

    let (store, memory) = build_store(&config).await?;

    // Redis expires keys itself; only the memory backend needs a sweeper.
    let cleanup_handle = memory.map(|store| spawn_cleanup_task(store, SWEEP_INTERVAL_SECS));

    let port = config.server_port;
    let proxy = Proxy::new(config, store)?;
    let app = create_router(AppState::new(proxy));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Prints every cached package path, one per line.
async fn list(config: Config) -> Result<()> {
    let (store, _) = build_store(&config).await?;
    let proxy = Proxy::new(config, store)?;

    for path in proxy.cached_paths().await? {
        println!("{path}");
    }

    Ok(())
}

/// Purges all cached packages and reports the count.
async fn purge(config: Config) -> Result<()> {
    let (store, _) = build_store(&config).await?;
    let proxy = Proxy::new(config, store)?;

    let purged = proxy.purge_cached_paths().await?;
    println!("purged {purged} cached packages");

    Ok(())
}

/// Builds the configured store backend.
///
/// Also returns the concrete memory store when that backend is chosen,
/// so the caller can hand it to the sweep task.
async fn build_store(config: &Config) -> Result<(Arc<dyn Store>, Option<Arc<MemoryStore>>)> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(&config.redis_url).await?;
            info!("Connected to Redis at {}", config.redis_url);
            Ok((Arc::new(store), None))
        }
        StoreBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            info!("Using in-memory store");
            Ok((store.clone() as Arc<dyn Store>, Some(store)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task (if any) and allows
/// graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Sweep task aborted");
    }
}
