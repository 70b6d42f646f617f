//! GET /api/health: configuration and upstream reachability.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::debug;

use crate::{
    app_core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::health::health_response::HealthReport,
};

/// Handler: GET /api/health
///
/// Always answers 200; the report says what is broken.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let reason = state.orchestrator().err().map(str::to_string);

    let providers = match &state.llm {
        Some(llm) => llm.health_all().await,
        None => Vec::new(),
    };

    let (vector_index, vector_error) = match &state.store {
        Some(store) => match store.stats().await {
            Ok(stats) => (Some(stats), None),
            Err(e) => (None, Some(e.to_string())),
        },
        None => (None, None),
    };

    let report = HealthReport {
        chat_configured: reason.is_none(),
        reason,
        providers,
        vector_index,
        vector_error,
    };
    debug!(?report, "health report");
    ApiResponse::success(report).into_response_with_status(StatusCode::OK)
}
