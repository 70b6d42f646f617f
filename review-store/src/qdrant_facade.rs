//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! Used when `VECTOR_KIND=qdrant`, e.g. for local development without a
//! Pinecone account. Exposes the same query/upsert/stats surface as
//! [`crate::pinecone::PineconeIndex`].

use std::collections::HashMap;
use std::time::Duration;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder, value::Kind,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::QdrantConfig;
use crate::errors::StoreError;
use crate::record::{IndexStats, ScoredMatch, VectorPoint};

/// A facade over the Qdrant client keeping the rest of the crate decoupled from it.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    /// Builds the client; the connection is established lazily on first call.
    pub fn new(cfg: &QdrantConfig, timeout: Duration) -> Result<Self, StoreError> {
        let mut builder = Qdrant::from_url(&cfg.url).timeout(timeout);
        if let Some(key) = &cfg.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ensures that the collection exists (cosine distance, `size` dimensions).
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it.
    pub async fn ensure_collection(&self, size: usize) -> Result<(), StoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(size as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        info!("Collection '{}' created (size={size})", self.collection);
        Ok(())
    }

    /// Upserts one batch; returns the number of points sent.
    pub async fn upsert(&self, points: &[VectorPoint]) -> Result<u64, StoreError> {
        if points.is_empty() {
            return Ok(0);
        }

        let batch: Vec<PointStruct> = points
            .iter()
            .map(|p| {
                PointStruct::new(
                    p.id.clone(),
                    p.values.clone(),
                    json_to_qpayload(&p.metadata),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, batch).wait(true))
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        debug!("Upserted {} points into '{}'", points.len(), self.collection);
        Ok(points.len() as u64)
    }

    /// Similarity search; hits are sorted by descending score.
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: u64,
        include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, StoreError> {
        let builder = SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k)
            .with_payload(include_metadata);

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let out: Vec<ScoredMatch> = res
            .result
            .into_iter()
            .map(|r| ScoredMatch {
                id: r.id.map(point_id_string).unwrap_or_default(),
                score: r.score,
                metadata: qpayload_to_json(r.payload),
            })
            .collect();

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }

    pub async fn stats(&self) -> Result<IndexStats, StoreError> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(IndexStats {
            backend: "qdrant",
            index: self.collection.clone(),
            dimension: None,
            total_vectors: info.result.and_then(|r| r.points_count),
        })
    }
}

fn point_id_string(id: PointId) -> String {
    match id.point_id_options {
        Some(PointIdOptions::Uuid(s)) => s,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

/// Converts flat JSON metadata into a Qdrant payload.
///
/// Nested objects/arrays are stored as their JSON text.
fn json_to_qpayload(m: &Map<String, Value>) -> HashMap<String, QValue> {
    m.iter()
        .filter_map(|(k, v)| {
            let kind = match v {
                Value::String(s) => Kind::StringValue(s.clone()),
                Value::Bool(b) => Kind::BoolValue(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Kind::IntegerValue(i),
                    None => Kind::DoubleValue(n.as_f64()?),
                },
                Value::Null => return None,
                other => Kind::StringValue(other.to_string()),
            };
            Some((k.clone(), QValue { kind: Some(kind) }))
        })
        .collect()
}

/// Converts a Qdrant payload into flat JSON.
///
/// Unsupported nested values are mapped to `Null`.
fn qpayload_to_json(p: HashMap<String, QValue>) -> Map<String, Value> {
    p.into_iter()
        .map(|(k, v)| {
            let j = match v.kind {
                Some(Kind::StringValue(s)) => Value::String(s),
                Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
                Some(Kind::DoubleValue(f)) => serde_json::json!(f),
                Some(Kind::BoolValue(b)) => Value::Bool(b),
                _ => Value::Null,
            };
            (k, j)
        })
        .collect()
}
