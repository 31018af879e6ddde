//! Cookie Cache - background context server
//!
//! Serves the cache store over HTTP so requesters in other processes can
//! reach it with `HttpTransport`.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cookie_cache::{api::create_router, stop_cache_store, AppState, CacheStore, Config};

/// Main entry point for the cookie cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the cache store, loading the cookie file if one is configured
/// 4. Start the listener task that owns the store
/// 5. Serve the router on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
/// 7. Let the listener drain once the server has stopped
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cookie_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cookie Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, purge_interval={}s, channel_capacity={}, cookie_file={:?}",
        config.server_port, config.purge_interval, config.channel_capacity, config.cookie_file
    );

    let store = CacheStore::from_config(&config).context("Failed to open cookie store")?;
    info!("Cache store opened with {} cookies", store.len());

    let (state, listener_handle) = AppState::spawn(store, &config);
    info!("Cache store listener started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    match stop_cache_store(listener_handle, Duration::from_secs(5)).await {
        Some(store) => info!("Cache store stopped with {} cookies", store.len()),
        None => warn!("Cache store listener did not stop cleanly"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// Returning lets the server finish in-flight requests before it stops.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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
}
