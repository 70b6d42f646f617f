//! Thin REST client for a Pinecone serverless index.
//!
//! - `GET  {controller}/indexes/{name}`: resolve the data-plane host (once)
//! - `POST {host}/query`: similarity search
//! - `POST {host}/vectors/upsert`: insert or overwrite vectors
//! - `POST {host}/describe_index_stats`: dimension and vector count

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::config::{PineconeConfig, normalize_host};
use crate::errors::StoreError;
use crate::record::{IndexStats, ScoredMatch, VectorPoint};

const API_VERSION: &str = "2024-07";
const BACKEND: &str = "pinecone";

pub struct PineconeIndex {
    client: reqwest::Client,
    cfg: PineconeConfig,
    host: OnceCell<String>,
}

impl PineconeIndex {
    /// Builds the HTTP client; performs no network calls.
    pub fn new(cfg: PineconeConfig, timeout: Duration) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&cfg.api_key).map_err(|_| {
            StoreError::Config("PINECONE_API_KEY is not a valid header value".into())
        })?;
        key.set_sensitive(true);
        headers.insert("Api-Key", key);
        headers.insert("X-Pinecone-API-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .build()?;

        let host = OnceCell::new_with(cfg.host.clone());
        Ok(Self { client, cfg, host })
    }

    pub fn index_name(&self) -> &str {
        &self.cfg.index
    }

    /// Queries the index; matches come back in descending score order.
    #[instrument(skip_all, fields(index = %self.cfg.index, top_k))]
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: u64,
        include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, StoreError> {
        let url = format!("{}/query", self.host().await?);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
            namespace: self.namespace(),
        };

        let out: QueryResponse = self.post_json(&url, &body).await?;
        debug!(matches = out.matches.len(), "pinecone query done");
        Ok(out.matches)
    }

    /// Upserts one batch; returns the count acknowledged by Pinecone.
    pub async fn upsert(&self, points: &[VectorPoint]) -> Result<u64, StoreError> {
        if points.is_empty() {
            return Ok(0);
        }
        let url = format!("{}/vectors/upsert", self.host().await?);
        let body = UpsertRequest {
            vectors: points,
            namespace: self.namespace(),
        };
        let out: UpsertResponse = self.post_json(&url, &body).await?;
        debug!(upserted = out.upserted_count, "pinecone upsert done");
        Ok(out.upserted_count)
    }

    pub async fn stats(&self) -> Result<IndexStats, StoreError> {
        let url = format!("{}/describe_index_stats", self.host().await?);
        let out: StatsResponse = self.post_json(&url, &serde_json::json!({})).await?;
        Ok(IndexStats {
            backend: BACKEND,
            index: self.cfg.index.clone(),
            dimension: out.dimension,
            total_vectors: out.total_vector_count,
        })
    }

    /* --------------------- Internals --------------------- */

    fn namespace(&self) -> Option<&str> {
        Some(self.cfg.namespace.as_str()).filter(|ns| !ns.is_empty())
    }

    async fn host(&self) -> Result<&str, StoreError> {
        self.host
            .get_or_try_init(|| self.describe_host())
            .await
            .map(String::as_str)
    }

    async fn describe_host(&self) -> Result<String, StoreError> {
        #[derive(Deserialize)]
        struct Described {
            host: String,
        }

        let base = self.cfg.controller_url.trim_end_matches('/');
        let url = format!("{base}/indexes/{}", self.cfg.index);
        debug!("GET {url}");
        let resp = self.client.get(&url).send().await?;
        let d: Described = decode(resp, &url).await?;
        let host = normalize_host(&d.host);
        info!(index = %self.cfg.index, %host, "resolved pinecone index host");
        Ok(host)
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        debug!("POST {url}");
        let resp = self.client.post(url).json(body).send().await?;
        decode(resp, url).await
    }
}

async fn decode<T>(resp: reqwest::Response, url: &str) -> Result<T, StoreError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(StoreError::HttpStatus {
            backend: BACKEND,
            status,
            url: url.to_string(),
            snippet: ai_llm_service::error_handler::make_snippet(&text),
        });
    }
    resp.json::<T>().await.map_err(|e| StoreError::Decode {
        backend: BACKEND,
        reason: e.to_string(),
    })
}

/* ==========================
HTTP payloads
========================== */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: u64,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ScoredMatch>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorPoint],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    dimension: Option<u64>,
    #[serde(default)]
    total_vector_count: Option<u64>,
}
