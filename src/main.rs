//! obmc_props - Property management for a remote-object service
//!
//! Serves the property and registry protocol over HTTP/JSON.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use obmc_props::api::create_router;
use obmc_props::{spawn_signal_logger, AppState, Config};

/// Main entry point for the property service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the object registry and cache location
/// 4. Start the background signal logger
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on the address chosen by the bus scope
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obmc_props=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting obmc_props property service");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_dir={}, bus={:?}, port={}, legacy_empty_array={}",
        config.cache_dir.display(),
        config.bus_scope,
        config.server_port,
        config.legacy_empty_array
    );

    // Create application state with an empty registry
    let state = AppState::from_config(&config);
    info!("Object registry initialized");

    // Start background signal logger
    let logger_handle = spawn_signal_logger(state.registry.read().await.subscribe());
    info!("Signal logger started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to the scope's address
    let addr = SocketAddr::new(config.bus_scope.bind_ip(), config.server_port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(logger_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the signal logger and allows graceful shutdown.
async fn shutdown_signal(logger_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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

    // Abort the signal logger
    logger_handle.abort();
    warn!("Signal logger aborted");
}
