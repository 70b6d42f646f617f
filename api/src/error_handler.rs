use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orchestrator::{OrchestratorError, OrchestratorResponse};
use thiserror::Error;

/// Public application error type.
///
/// Request errors render as the chat envelope `{ "success": false, "message": ... }`
/// so the UI can read them the same way as successful answers.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// Missing credentials or settings; reported per request.
    #[error("{0}")]
    Configuration(String),

    /// An external service failed.
    #[error("{0}")]
    Upstream(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Bind { .. } | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(OrchestratorResponse::fail(self.to_string()))).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            e @ OrchestratorError::InvalidInput(_) => AppError::BadRequest(e.user_message()),
            e @ OrchestratorError::Configuration(_) => AppError::Configuration(e.user_message()),
            e @ OrchestratorError::Upstream { .. } => AppError::Upstream(e.user_message()),
        }
    }
}
