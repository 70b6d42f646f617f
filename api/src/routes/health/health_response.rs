use ai_llm_service::HealthStatus;
use review_store::IndexStats;
use serde::Serialize;

/// Payload of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `true` when `/api/chat` can serve requests.
    pub chat_configured: bool,
    /// Why chat is not configured (missing keys, invalid settings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// One entry per distinct generation/embedding profile.
    pub providers: Vec<HealthStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_index: Option<IndexStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_error: Option<String>,
}
