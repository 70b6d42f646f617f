//! Collaborator seams: embedding, vector search, and generation.
//!
//! Production adapters wrap [`LlmServiceProfiles`] and [`ReviewStore`];
//! tests substitute doubles.

use std::{future::Future, pin::Pin};

use ai_llm_service::{Candidate, LlmServiceProfiles};
use review_store::{ReviewStore, ScoredMatch};

use crate::error::{OrchestratorError, from_llm, from_store};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, OrchestratorError>> + Send + 'a>>;

/// Turns texts into vectors, one per input.
pub trait Embedder: Send + Sync {
    fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Vec<Vec<f32>>>;
}

/// Similarity search over the review index.
pub trait VectorSearch: Send + Sync {
    fn query<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: u64,
        include_metadata: bool,
    ) -> BoxFuture<'a, Vec<ScoredMatch>>;
}

/// Produces candidate answers for a prompt.
pub trait Generator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Vec<Candidate>>;
}

impl Embedder for LlmServiceProfiles {
    fn embed<'a>(&'a self, texts: &'a [String]) -> BoxFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            LlmServiceProfiles::embed(self, texts)
                .await
                .map_err(|e| from_llm("embedding", e))
        })
    }
}

impl Generator for LlmServiceProfiles {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Vec<Candidate>> {
        Box::pin(async move {
            LlmServiceProfiles::generate(self, prompt)
                .await
                .map_err(|e| from_llm("generation", e))
        })
    }
}

impl VectorSearch for ReviewStore {
    fn query<'a>(
        &'a self,
        vector: &'a [f32],
        top_k: u64,
        include_metadata: bool,
    ) -> BoxFuture<'a, Vec<ScoredMatch>> {
        Box::pin(async move {
            ReviewStore::query(self, vector, top_k, include_metadata)
                .await
                .map_err(from_store)
        })
    }
}
