//! Main webserver implementation
//!
//! Builds the axum router around an `AppState` and serves it until Ctrl+C.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::{logging, process_info, ProcessId};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;
use crate::web::handlers::{health_check, trigger_cycle};

pub struct WebServer {
    state: AppState,
    bind_address: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState, bind_address: SocketAddr) -> Self {
        Self { state, bind_address }
    }

    /// Build the Axum router with all routes
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/cycle", post(trigger_cycle))
            .route("/health", get(health_check))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
            .with_state(state)
    }

    /// Serve until Ctrl+C
    pub async fn run(self) -> WebServerResult<()> {
        let router = Self::build_router(self.state);

        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {}: {}", self.bind_address, e)))?;

        process_info!(ProcessId::current(), "🌐 Listening on http://{}", self.bind_address);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
    }
}
