//! Clean PDF API server
//!
//! Accepts HTML over HTTP and returns rendered PDFs, with bounded render
//! concurrency, per-request timeouts and a startup engine self-test.

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_api::config::Config;
use pdf_api::routes;
use pdf_api::state::AppState;
use pdf_api::{SERVICE_TITLE, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter so RUST_LOG can come from it
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting {} v{}", SERVICE_TITLE, VERSION);
    tracing::info!(
        workers = config.render.workers,
        queue_depth = config.render.queue_depth,
        timeout_ms = config.render.timeout.as_millis() as u64,
        command = %config.render.command,
        "Render pool configured"
    );

    let state = AppState::from_config(config.clone());

    // Exercise the engine before taking traffic; a failure only degrades health
    tracing::info!("Testing render engine...");
    if !state.probe().self_test().await {
        tracing::warn!("Render engine self-test failed. Serving anyway; /convert will still attempt renders");
    }

    let app = routes::router(state.clone());

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    tracing::info!("{} listening on {}", SERVICE_TITLE, listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.shutdown();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
