//! Typed error for the orchestrator crate.

use thiserror::Error;

/// Message returned for a missing, empty, or non-string question.
pub const INVALID_QUESTION: &str = "Invalid question format. Expected a non-empty string.";

/// Message returned when a failure carries no usable cause.
pub const GENERIC_FAILURE: &str = "An error occurred while processing the request.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The question is missing, empty, or not a string.
    #[error("{0}")]
    InvalidInput(String),

    /// Credentials or settings are missing; reported on every request until fixed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An external service failed; `service` names which one.
    #[error("{service} service failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
}

impl OrchestratorError {
    pub fn invalid_question() -> Self {
        Self::InvalidInput(INVALID_QUESTION.to_string())
    }

    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Caller-facing text: the error's message, or [`GENERIC_FAILURE`] when the cause is blank.
    pub fn user_message(&self) -> String {
        let cause = match self {
            Self::InvalidInput(m) | Self::Configuration(m) => m,
            Self::Upstream { message, .. } => message,
        };
        if cause.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Maps a provider error; configuration problems keep their own variant.
pub(crate) fn from_llm(service: &'static str, e: ai_llm_service::AiLlmError) -> OrchestratorError {
    if e.is_config() {
        OrchestratorError::Configuration(e.to_string())
    } else {
        OrchestratorError::upstream(service, e.to_string())
    }
}

pub(crate) fn from_store(e: review_store::StoreError) -> OrchestratorError {
    if e.is_config() {
        OrchestratorError::Configuration(e.to_string())
    } else {
        OrchestratorError::upstream("vector search", e.to_string())
    }
}
