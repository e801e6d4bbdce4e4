//! Gallery Cache - cache administration service
//!
//! Runs the cache layer standalone with its HTTP admin surface, so operators
//! can inspect health and metrics and invalidate families.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gallery_cache::api::create_router;
use gallery_cache::cache::{select_backend, CacheDurations, CacheFamilies, CacheManager, CacheMetrics};
use gallery_cache::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the cache administration service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Bind the cache backend (remote if credentials are set)
/// 4. Start the expiry sweep when running in-memory
/// 5. Serve the admin router until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gallery Cache service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: remote={}, default_ttl={}s, port={}, cleanup_interval={}s",
        config.remote_credentials().is_some(),
        config.default_ttl,
        config.server_port,
        config.cleanup_interval
    );

    let selected = select_backend(&config);
    let manager = CacheManager::new(selected.as_backend(), Arc::new(CacheMetrics::new()))
        .with_default_ttl(config.default_ttl);
    let families = CacheFamilies::new(Arc::new(manager), CacheDurations::default());

    let mut background = Vec::new();
    if let Some(memory) = selected.memory() {
        background.push(spawn_cleanup_task(memory, config.cleanup_interval));
        info!("Expiry sweep task started");
    }
    if let Some(interval) = config.warming_interval() {
        // Warming needs the storefront's data source; only library users can supply it
        warn!(
            "WARM_INTERVAL={}s is set but the standalone service has no warm source; skipping",
            interval
        );
    }

    let health = families.manager().health().await;
    info!(
        "Cache ready: remote_available={}, keys={}",
        health.remote_available, health.key_count
    );

    let app = create_router(AppState::new(families));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts background tasks.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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

    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
