//! Professor-review vector index: retrieval and ingestion.
//!
//! This crate provides a small API to:
//! - Query the review index by vector (Pinecone by default, Qdrant optional)
//! - Ingest scraped review dumps (JSON array or JSONL) with batched embeddings
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
mod embed;
mod embed_pool;
mod errors;
mod ingest;
mod io_jsonl;
mod mappers;
mod pinecone;
mod qdrant_facade;
mod record;

use std::path::Path;
use std::time::Duration;

pub use config::{BackendConfig, BackendKind, PineconeConfig, QdrantConfig, StoreConfig};
pub use embed::EmbeddingsProvider;
pub use errors::StoreError;
pub use ingest::IngestReport;
pub use record::{IndexStats, ReviewRecord, ScoredMatch, VectorPoint};

use tracing::{debug, trace};

/// Concrete backend behind [`ReviewStore`].
pub(crate) enum VectorBackend {
    Pinecone(pinecone::PineconeIndex),
    Qdrant(qdrant_facade::QdrantFacade),
}

impl VectorBackend {
    fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let timeout = Duration::from_secs(cfg.timeout_secs);
        Ok(match &cfg.backend {
            BackendConfig::Pinecone(p) => {
                Self::Pinecone(pinecone::PineconeIndex::new(p.clone(), timeout)?)
            }
            BackendConfig::Qdrant(q) => Self::Qdrant(qdrant_facade::QdrantFacade::new(q, timeout)?),
        })
    }

    pub(crate) fn index_name(&self) -> &str {
        match self {
            Self::Pinecone(p) => p.index_name(),
            Self::Qdrant(q) => q.collection(),
        }
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: u64,
        include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, StoreError> {
        match self {
            Self::Pinecone(p) => p.query(vector, top_k, include_metadata).await,
            Self::Qdrant(q) => q.query(vector, top_k, include_metadata).await,
        }
    }

    pub(crate) async fn upsert(&self, points: &[VectorPoint]) -> Result<u64, StoreError> {
        match self {
            Self::Pinecone(p) => p.upsert(points).await,
            Self::Qdrant(q) => q.upsert(points).await,
        }
    }

    async fn stats(&self) -> Result<IndexStats, StoreError> {
        match self {
            Self::Pinecone(p) => p.stats().await,
            Self::Qdrant(q) => q.stats().await,
        }
    }

    /// Makes the index ready for `dim`-sized vectors before upserting.
    ///
    /// Qdrant collections are created on demand; Pinecone indexes are
    /// provisioned out of band, so only the dimension is checked.
    pub(crate) async fn prepare(&self, dim: usize) -> Result<(), StoreError> {
        match self {
            Self::Qdrant(q) => q.ensure_collection(dim).await,
            Self::Pinecone(p) => match p.stats().await?.dimension {
                Some(want) if want as usize != dim => {
                    Err(StoreError::VectorSizeMismatch { got: dim, want: want as usize })
                }
                _ => Ok(()),
            },
        }
    }
}

/// High-level facade over the configured vector backend.
///
/// This is the single entry point recommended for application code.
pub struct ReviewStore {
    cfg: StoreConfig,
    backend: VectorBackend,
}

impl ReviewStore {
    /// Constructs a new store; no network calls are made here.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] if the config is invalid or the client cannot be built.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;
        trace!("ReviewStore::new backend={:?}", cfg.backend.kind());
        let backend = VectorBackend::new(&cfg)?;
        Ok(Self { cfg, backend })
    }

    /// Shortcut for `ReviewStore::new(StoreConfig::from_env()?)`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(StoreConfig::from_env()?)
    }

    /// Index (Pinecone) or collection (Qdrant) name.
    pub fn index_name(&self) -> &str {
        self.backend.index_name()
    }

    /// Similarity search; matches keep the backend's descending-score order.
    ///
    /// # Errors
    /// Returns transport, status, or decode errors from the backend.
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: u64,
        include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, StoreError> {
        trace!("ReviewStore::query top_k={top_k} include_metadata={include_metadata}");
        self.backend.query(vector, top_k, include_metadata).await
    }

    /// Index dimension and vector count.
    pub async fn stats(&self) -> Result<IndexStats, StoreError> {
        self.backend.stats().await
    }

    /// Ingests a JSON array or JSONL dump of scraped reviews.
    ///
    /// # Errors
    /// Returns errors on I/O, array parse, embedding, or backend failures.
    pub async fn ingest_file(
        &self,
        path: impl AsRef<Path>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<IngestReport, StoreError> {
        debug!("ReviewStore::ingest_file path={:?}", path.as_ref());
        ingest::ingest_file(&self.cfg, &self.backend, path, provider).await
    }

    /// Ingests already-parsed dump entries.
    pub async fn ingest_values(
        &self,
        values: &[serde_json::Value],
        provider: &dyn EmbeddingsProvider,
    ) -> Result<IngestReport, StoreError> {
        ingest::ingest_values(&self.cfg, &self.backend, values, provider).await
    }
}
