//! Runtime configuration for the vector backend and ingestion.

use std::str::FromStr;

use crate::errors::StoreError;

pub const DEFAULT_INDEX: &str = "reviews";
pub const DEFAULT_PINECONE_CONTROLLER: &str = "https://api.pinecone.io";
pub const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6334";

/// Supported vector backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Pinecone,
    Qdrant,
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pinecone" => Ok(Self::Pinecone),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(StoreError::Config(format!(
                "unsupported VECTOR_KIND '{other}' (expected pinecone|qdrant)"
            ))),
        }
    }
}

/// Pinecone connection settings.
#[derive(Clone, PartialEq)]
pub struct PineconeConfig {
    pub api_key: String,
    /// Index name; used to resolve the data-plane host when `host` is unset.
    pub index: String,
    /// Data-plane host, e.g. `https://reviews-abc123.svc.pinecone.io`.
    pub host: Option<String>,
    /// Control-plane base URL.
    pub controller_url: String,
    /// Namespace inside the index; empty means the default namespace.
    pub namespace: String,
}

impl std::fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"<redacted>")
            .field("index", &self.index)
            .field("host", &self.host)
            .field("controller_url", &self.controller_url)
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Qdrant connection settings.
#[derive(Clone, PartialEq)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

impl std::fmt::Debug for QdrantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .finish()
    }
}

/// Backend selection plus its settings.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendConfig {
    Pinecone(PineconeConfig),
    Qdrant(QdrantConfig),
}

impl BackendConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::Pinecone(_) => BackendKind::Pinecone,
            BackendConfig::Qdrant(_) => BackendKind::Qdrant,
        }
    }
}

/// Configuration for retrieval and ingestion.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub backend: BackendConfig,
    /// Request timeout for vector backend calls.
    pub timeout_secs: u64,
    /// Points per upsert request.
    pub upsert_batch: usize,
    /// Texts per embedding call during ingestion.
    pub embedding_batch: usize,
    /// Concurrent embedding calls during ingestion.
    pub embedding_concurrency: usize,
}

impl StoreConfig {
    /// Builds a config with default tuning for the given backend.
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            timeout_secs: 30,
            upsert_batch: 100,
            embedding_batch: 32,
            embedding_concurrency: 4,
        }
    }

    /// Reads the config from the process environment.
    ///
    /// # Errors
    /// [`StoreError::MissingVar`] / [`StoreError::Config`] on absent or invalid values.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(&|k: &str| std::env::var(k).ok())
    }

    /// Reads the config through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match opt_env(lookup, "VECTOR_KIND") {
            Some(v) => v.parse::<BackendKind>()?,
            None => BackendKind::Pinecone,
        };

        let backend = match kind {
            BackendKind::Pinecone => {
                let controller_url = opt_env(lookup, "PINECONE_CONTROLLER_URL")
                    .unwrap_or_else(|| DEFAULT_PINECONE_CONTROLLER.into());
                validate_http("PINECONE_CONTROLLER_URL", &controller_url)?;
                BackendConfig::Pinecone(PineconeConfig {
                    api_key: must_env(lookup, "PINECONE_API_KEY")?,
                    index: opt_env(lookup, "PINECONE_INDEX")
                        .unwrap_or_else(|| DEFAULT_INDEX.into()),
                    host: opt_env(lookup, "PINECONE_INDEX_HOST").map(|h| normalize_host(&h)),
                    controller_url,
                    namespace: opt_env(lookup, "PINECONE_NAMESPACE").unwrap_or_default(),
                })
            }
            BackendKind::Qdrant => {
                let url =
                    opt_env(lookup, "QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.into());
                validate_http("QDRANT_URL", &url)?;
                BackendConfig::Qdrant(QdrantConfig {
                    url,
                    api_key: opt_env(lookup, "QDRANT_API_KEY"),
                    collection: opt_env(lookup, "QDRANT_COLLECTION")
                        .unwrap_or_else(|| DEFAULT_INDEX.into()),
                })
            }
        };

        let mut cfg = Self::new(backend);
        if let Some(v) = env_usize(lookup, "VECTOR_TIMEOUT_SECS")? {
            cfg.timeout_secs = v as u64;
        }
        if let Some(v) = env_usize(lookup, "UPSERT_BATCH")? {
            cfg.upsert_batch = v;
        }
        if let Some(v) = env_usize(lookup, "EMBEDDING_BATCH")? {
            cfg.embedding_batch = v;
        }
        if let Some(v) = env_usize(lookup, "EMBEDDING_CONCURRENCY")? {
            cfg.embedding_concurrency = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        match &self.backend {
            BackendConfig::Pinecone(p) => {
                if p.api_key.trim().is_empty() {
                    return Err(StoreError::MissingVar("PINECONE_API_KEY"));
                }
                if p.index.trim().is_empty() && p.host.is_none() {
                    return Err(StoreError::Config("pinecone index name is empty".into()));
                }
            }
            BackendConfig::Qdrant(q) => {
                if q.collection.trim().is_empty() {
                    return Err(StoreError::Config("collection is empty".into()));
                }
            }
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("VECTOR_TIMEOUT_SECS must be > 0".into()));
        }
        if self.upsert_batch == 0 || self.embedding_batch == 0 || self.embedding_concurrency == 0 {
            return Err(StoreError::Config("batch sizes and concurrency must be > 0".into()));
        }
        Ok(())
    }
}

/// Pinecone reports hosts without a scheme.
pub(crate) fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn opt_env<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn must_env<F>(lookup: &F, name: &'static str) -> Result<String, StoreError>
where
    F: Fn(&str) -> Option<String>,
{
    opt_env(lookup, name).ok_or(StoreError::MissingVar(name))
}

fn env_usize<F>(lookup: &F, name: &'static str) -> Result<Option<usize>, StoreError>
where
    F: Fn(&str) -> Option<String>,
{
    match opt_env(lookup, name) {
        Some(v) => v
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| StoreError::Config(format!("{name}: expected a positive integer"))),
        None => Ok(None),
    }
}

fn validate_http(var: &str, value: &str) -> Result<(), StoreError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(StoreError::Config(format!(
            "{var} must start with http:// or https://"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn pinecone_is_the_default_backend() {
        let cfg = StoreConfig::from_lookup(&lookup_from(&[("PINECONE_API_KEY", "pk")])).unwrap();
        match cfg.backend {
            BackendConfig::Pinecone(p) => {
                assert_eq!(p.index, "reviews");
                assert_eq!(p.controller_url, DEFAULT_PINECONE_CONTROLLER);
                assert!(p.host.is_none());
                assert!(p.namespace.is_empty());
            }
            other => panic!("unexpected backend {other:?}"),
        }
        assert_eq!(cfg.upsert_batch, 100);
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn missing_pinecone_key_is_a_config_error() {
        let err = StoreConfig::from_lookup(&lookup_from(&[])).unwrap_err();
        assert!(matches!(err, StoreError::MissingVar("PINECONE_API_KEY")));
        assert!(err.is_config());
    }

    #[test]
    fn host_gets_https_scheme() {
        let cfg = StoreConfig::from_lookup(&lookup_from(&[
            ("PINECONE_API_KEY", "pk"),
            ("PINECONE_INDEX_HOST", "reviews-abc.svc.pinecone.io/"),
        ]))
        .unwrap();
        let BackendConfig::Pinecone(p) = cfg.backend else {
            panic!("expected pinecone");
        };
        assert_eq!(p.host.as_deref(), Some("https://reviews-abc.svc.pinecone.io"));
    }

    #[test]
    fn qdrant_needs_no_credentials() {
        let cfg = StoreConfig::from_lookup(&lookup_from(&[
            ("VECTOR_KIND", "qdrant"),
            ("UPSERT_BATCH", "64"),
        ]))
        .unwrap();
        assert_eq!(cfg.backend.kind(), BackendKind::Qdrant);
        assert_eq!(cfg.upsert_batch, 64);
    }

    #[test]
    fn rejects_zero_concurrency_and_bad_numbers() {
        let base = [("VECTOR_KIND", "qdrant")];
        let zero =
            StoreConfig::from_lookup(&lookup_from(&[base[0], ("EMBEDDING_CONCURRENCY", "0")]));
        assert!(zero.is_err());
        let nan = StoreConfig::from_lookup(&lookup_from(&[base[0], ("UPSERT_BATCH", "many")]));
        assert!(nan.unwrap_err().to_string().contains("UPSERT_BATCH"));
    }

    #[test]
    fn debug_redacts_keys() {
        let p = PineconeConfig {
            api_key: "secret".into(),
            index: "reviews".into(),
            host: None,
            controller_url: DEFAULT_PINECONE_CONTROLLER.into(),
            namespace: String::new(),
        };
        assert!(!format!("{p:?}").contains("secret"));
    }
}
