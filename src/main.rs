//! Place Explorer Server - Binary Entry Point
//!
//! This is the main entry point for the place-explorer binary.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use place_explorer::api::http::create_router;
use place_explorer::api::websocket::AppState;
use place_explorer::{AppResult, LogFormat, ServerConfig};

const DEFAULT_LOG_FILTER: &str = "place_explorer=info,tower_http=info";

#[tokio::main]
async fn main() -> AppResult<()> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    tracing::info!(
        "{} v{} starting",
        place_explorer::NAME,
        place_explorer::VERSION
    );

    let state = Arc::new(AppState::new(config.clone()));
    let app = create_router(state.clone());

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        status_interval_ms = config.status_interval.as_millis() as u64,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.registry.shutdown().await;
    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().pretty().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
