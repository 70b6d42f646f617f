//! POST /api/chat: answers a question from professor reviews.

use std::{sync::Arc, time::Instant};

use axum::{Json, extract::State, http::HeaderMap};
use orchestrator::{OrchestratorResponse, Query};
use tracing::{info, warn};

use crate::{
    app_core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::{json_extractor::AppJson, request_id::incoming_request_id},
};

/// Handler: POST /api/chat
///
/// Validation runs before the configuration check, so malformed questions are
/// rejected with 400 even when credentials are missing.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"Who teaches algorithms well?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    AppJson(query): AppJson<Query>,
) -> AppResult<Json<OrchestratorResponse>> {
    let request_id = incoming_request_id(&headers).unwrap_or_default();
    query.question_text()?;

    let orchestrator = state.orchestrator().map_err(|reason| {
        warn!(%request_id, %reason, "chat request without configuration");
        AppError::Configuration(format!("configuration error: {reason}"))
    })?;

    let started = Instant::now();
    match orchestrator.answer(&query).await {
        Ok(answer) => {
            info!(
                %request_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                answer_chars = answer.len(),
                "chat answered"
            );
            Ok(Json(OrchestratorResponse::ok(answer)))
        }
        Err(e) => {
            warn!(
                %request_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "chat failed"
            );
            Err(e.into())
        }
    }
}
