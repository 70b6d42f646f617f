//! Health checks for generation/embedding backends (Gemini, Ollama).
//!
//! - Gemini: `GET {endpoint}/v1beta/models/{model}` with the API key header
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] never fails (errors mapped to `ok=false`).
//! Provider-specific probes (`try_*`) return strict `Result`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, is_http_endpoint, make_snippet};

/// A serializable health snapshot for a single provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "Gemini", "Ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// A health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self { client })
    }

    /// Checks health for a single config, routing to the provider-specific probe.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        if !is_http_endpoint(&cfg.endpoint) {
            warn!(
                provider = ?cfg.provider,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::new(cfg, false, 0, "invalid endpoint");
        }

        let started = Instant::now();
        let probe = match cfg.provider {
            LlmProvider::Gemini => self.try_gemini(cfg).await,
            LlmProvider::Ollama => self.try_ollama(cfg).await,
        };
        let latency_ms = started.elapsed().as_millis();

        match probe {
            Ok(message) => HealthStatus::new(cfg, true, latency_ms, message),
            Err(err) => {
                warn!(provider = ?cfg.provider, error = %err, "health probe failed");
                HealthStatus::new(cfg, false, latency_ms, err.to_string())
            }
        }
    }

    /// Checks several configs sequentially, preserving order.
    pub async fn check_many(&self, cfgs: &[LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(cfgs.len());
        for cfg in cfgs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// Gemini probe: fetches the model resource.
    ///
    /// # Errors
    /// [`HealthError::HttpStatus`] on non-2xx (bad key, unknown model),
    /// [`AiLlmError::HttpTransport`] on network failure.
    pub async fn try_gemini(&self, cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
        let base = cfg.endpoint.trim().trim_end_matches('/');
        let model = cfg.model.trim_start_matches("models/");
        let url = format!("{base}/v1beta/models/{model}");
        debug!("GET {url}");

        let mut req = self.client.get(&url);
        if let Some(key) = &cfg.api_key {
            req = req.header("x-goog-api-key", key);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            })
            .into());
        }
        Ok(format!("model {model} available"))
    }

    /// Ollama probe: lists local models and looks for the configured one.
    ///
    /// A reachable server without the model is reported as healthy with a hint,
    /// since Ollama pulls models on demand.
    pub async fn try_ollama(&self, cfg: &LlmModelConfig) -> Result<String, AiLlmError> {
        #[derive(Deserialize)]
        struct Tags {
            #[serde(default)]
            models: Vec<Tag>,
        }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }

        let base = cfg.endpoint.trim().trim_end_matches('/');
        let url = format!("{base}/api/tags");
        debug!("GET {url}");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            })
            .into());
        }

        let tags: Tags = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(e.to_string()))?;

        let present = tags
            .models
            .iter()
            .any(|t| t.name == cfg.model || t.name.split(':').next() == Some(cfg.model.as_str()));

        Ok(if present {
            format!("model {} present", cfg.model)
        } else {
            format!("server reachable, model {} not pulled yet", cfg.model)
        })
    }
}
