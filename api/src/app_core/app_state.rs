use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use ai_llm_service::config::default_config::{
    embedding_config_from_env, generation_config_from_env,
};
use orchestrator::Orchestrator;
use review_store::ReviewStore;
use tracing::{info, warn};

/// Timeout for provider health probes, seconds.
const HEALTH_TIMEOUT_SECS: u64 = 10;

/// Shared state for all HTTP handlers.
///
/// Missing credentials do not stop the server: the reason is kept and
/// reported on every chat request until the process is restarted with a
/// fixed environment.
pub struct AppState {
    chat: Result<Orchestrator, String>,
    /// Provider profiles, when they could be built (used by `/api/health`).
    pub llm: Option<Arc<LlmServiceProfiles>>,
    /// Vector index, when it could be built (used by `/api/health`).
    pub store: Option<Arc<ReviewStore>>,
}

impl AppState {
    /// Builds the generative-AI profiles and the review index from the environment.
    pub fn from_env() -> Self {
        let llm = generation_config_from_env()
            .and_then(|generation| {
                let embedding = embedding_config_from_env()?;
                LlmServiceProfiles::new(generation, embedding, Some(HEALTH_TIMEOUT_SECS))
            })
            .map(Arc::new)
            .map_err(|e| e.to_string());
        let store = ReviewStore::from_env()
            .map(Arc::new)
            .map_err(|e| e.to_string());
        Self::from_parts(llm, store)
    }

    /// Wires the orchestrator when both services are available.
    pub fn from_parts(
        llm: Result<Arc<LlmServiceProfiles>, String>,
        store: Result<Arc<ReviewStore>, String>,
    ) -> Self {
        let chat = match (&llm, &store) {
            (Ok(l), Ok(s)) => {
                info!(index = s.index_name(), "chat orchestrator ready");
                Ok(Orchestrator::from_services(l.clone(), s.clone()))
            }
            _ => {
                let reason = [llm.as_ref().err(), store.as_ref().err()]
                    .into_iter()
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join("; ");
                warn!(%reason, "chat is not configured; requests will fail until fixed");
                Err(reason)
            }
        };
        Self {
            chat,
            llm: llm.ok(),
            store: store.ok(),
        }
    }

    /// State around a prebuilt orchestrator (no health collaborators).
    pub fn with_orchestrator(orchestrator: Orchestrator) -> Self {
        Self {
            chat: Ok(orchestrator),
            llm: None,
            store: None,
        }
    }

    /// State whose chat endpoint always reports `reason` as a configuration error.
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            chat: Err(reason.into()),
            llm: None,
            store: None,
        }
    }

    /// The orchestrator, or the configuration problem that prevents building it.
    pub fn orchestrator(&self) -> Result<&Orchestrator, &str> {
        self.chat.as_ref().map_err(String::as_str)
    }
}
