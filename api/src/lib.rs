//! HTTP surface of HunterMatch.
//!
//! - `GET  /`: browser chat page
//! - `POST /api/chat`: `{ "question": string }` → `{ success, data?, message? }`
//! - `GET  /api/health`: configuration and upstream status

pub mod app_core;
mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use crate::app_core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::app_core::http::response_envelope::ApiResponse;
use crate::middleware_layer::request_id::propagate_request_id;
use crate::routes::{chat::chat_route::chat, health::health_route::health, index_route::index_page};

/// Default bind address when `API_ADDRESS` is unset.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";

/// `API_ADDRESS` or [`DEFAULT_ADDRESS`].
pub fn address_from_env() -> String {
    std::env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
}

/// Builds the router over shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn(propagate_request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] if the address is unavailable, [`AppError::Server`] on I/O failure.
pub async fn start(state: Arc<AppState>, addr: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!("HunterMatch API listening on http://{addr}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("HunterMatch API stopped");
    Ok(())
}

async fn not_found() -> Response {
    ApiResponse::<()>::error("NOT_FOUND", "no such route")
        .into_response_with_status(StatusCode::NOT_FOUND)
}

/// Returns a future that resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed.
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
