//! Page Prefetch Cache - diagnostics server
//!
//! Hosts one cache engine and exposes it over HTTP so the cache can be
//! inspected and driven from a browser panel or curl.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use page_prefetch_cache::api::{create_router, AppState};
use page_prefetch_cache::{Config, HttpTransport};

/// Main entry point for the diagnostics server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the HTTP transport and cache engine
/// 4. Subscribe a logging listener to cache changes
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_prefetch_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting page prefetch cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: size_limit={}, origin={}, retry_delay={}ms, max_retries={}, port={}",
        config.size_limit, config.origin, config.retry_delay_ms, config.max_retries, config.server_port
    );

    let transport = HttpTransport::new(config.request_timeout())
        .context("failed to create HTTP transport")?;
    let state = AppState::from_config(&config, Arc::new(transport))
        .context("failed to create cache engine")?;

    state
        .engine
        .subscribe(|snapshot| {
            let pending = snapshot.values().filter(|entry| entry.pending).count();
            debug!(entries = snapshot.len(), pending, "cache updated");
        })
        .await;
    info!("Cache engine initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
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
}
