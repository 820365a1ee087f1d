//! HTTP front end for the savanna ecosystem simulation.

mod api;
mod telemetry;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use parking_lot::Mutex;
use savanna_core::ServerConfig;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::default();

    telemetry::init_telemetry();

    info!(
        "Starting savanna server on {}:{}",
        config.bind_address, config.port
    );

    let state = api::AppState {
        sim: Arc::new(Mutex::new(None)),
        seed: config.seed,
    };

    // Build API router
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/start-simulation", post(api::start_simulation))
        .route("/next-iteration", get(api::next_iteration))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
