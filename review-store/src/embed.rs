//! Embedding provider seam used during ingestion.

use std::{future::Future, pin::Pin};

use ai_llm_service::LlmServiceProfiles;

use crate::errors::StoreError;

/// Asynchronous batch embedding provider.
///
/// Implement this trait to plug in another embedding backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Returns one vector per input text, in input order.
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>>;
}

impl EmbeddingsProvider for LlmServiceProfiles {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            self.embed(texts)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))
        })
    }
}
