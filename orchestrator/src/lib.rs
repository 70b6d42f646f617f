//! Question answering over professor reviews.
//!
//! Public API: [`Orchestrator::answer`]. It validates the question, embeds it,
//! retrieves the top-5 reviews, builds a prompt with the reviews as JSON
//! context, calls the generation model, and returns its first candidate.
//! [`Orchestrator::respond`] wraps the result in the UI envelope.

mod api_types;
mod collaborators;
mod error;
pub mod prompt;

use std::sync::Arc;

pub use api_types::{OrchestratorResponse, Query, RetrievedMatch};
pub use collaborators::{BoxFuture, Embedder, Generator, VectorSearch};
pub use error::{GENERIC_FAILURE, INVALID_QUESTION, OrchestratorError};

use ai_llm_service::LlmServiceProfiles;
use review_store::ReviewStore;
use tracing::{debug, info, instrument, warn};

/// Number of reviews retrieved per question.
pub const TOP_K: u64 = 5;

/// Answer used when the model returns no usable text.
pub const FALLBACK_ANSWER: &str = "No response available";

/// Embed → retrieve → prompt → generate, with injected collaborators.
///
/// Holds no per-request state; share one instance behind an `Arc`.
#[derive(Clone)]
pub struct Orchestrator {
    embedder: Arc<dyn Embedder>,
    search: Arc<dyn VectorSearch>,
    generator: Arc<dyn Generator>,
}

impl Orchestrator {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        search: Arc<dyn VectorSearch>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            embedder,
            search,
            generator,
        }
    }

    /// Wires the production services: one LLM profile set for embedding and
    /// generation, the review index for search.
    pub fn from_services(llm: Arc<LlmServiceProfiles>, store: Arc<ReviewStore>) -> Self {
        Self::new(llm.clone(), store, llm)
    }

    /// Answers one question.
    ///
    /// Collaborators are called sequentially; the first failure ends the
    /// request with no further external calls.
    ///
    /// # Errors
    /// - [`OrchestratorError::InvalidInput`] if the question is not a non-empty string
    /// - [`OrchestratorError::Configuration`] if a collaborator lacks credentials
    /// - [`OrchestratorError::Upstream`] if a collaborator fails
    #[instrument(skip_all)]
    pub async fn answer(&self, query: &Query) -> Result<String, OrchestratorError> {
        let question = query.question_text()?;
        debug!(chars = question.len(), "question accepted");

        let input = [question.to_string()];
        let mut vectors = self.embedder.embed(&input).await?;
        if vectors.len() != 1 || vectors[0].is_empty() {
            return Err(OrchestratorError::upstream(
                "embedding",
                format!("expected one non-empty vector, got {}", vectors.len()),
            ));
        }
        let vector = vectors.swap_remove(0);

        let hits = self.search.query(&vector, TOP_K, true).await?;
        let matches: Vec<RetrievedMatch> = hits
            .iter()
            .take(TOP_K as usize)
            .map(|h| RetrievedMatch::from_metadata(&h.metadata))
            .collect();
        info!(matches = matches.len(), "reviews retrieved");

        let prompt = prompt::build_prompt(question, &matches);
        let candidates = self.generator.generate(&prompt).await?;

        match candidates.into_iter().next() {
            Some(c) if !c.text.trim().is_empty() => Ok(c.text),
            other => {
                warn!(
                    finish_reason = ?other.and_then(|c| c.finish_reason),
                    "generation returned no usable text; using fallback"
                );
                Ok(FALLBACK_ANSWER.to_string())
            }
        }
    }

    /// [`Self::answer`] folded into the UI envelope.
    pub async fn respond(&self, query: &Query) -> OrchestratorResponse {
        match self.answer(query).await {
            Ok(text) => OrchestratorResponse::ok(text),
            Err(e) => {
                warn!(error = %e, "question failed");
                OrchestratorResponse::from(&e)
            }
        }
    }
}
