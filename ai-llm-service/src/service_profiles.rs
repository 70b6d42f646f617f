//! Shared generative-AI service with two active profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (provider+endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::config::default_config::{
//!     embedding_config_from_env, generation_config_from_env,
//! };
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(
//!     generation_config_from_env()?,
//!     embedding_config_from_env()?,
//!     Some(10),
//! )?);
//!
//! let candidates = svc.generate("Who teaches algorithms well?").await?;
//! println!("{} candidate(s)", candidates.len());
//!
//! let vectors = svc.embed(&["Great explanations".to_string()]).await?;
//! println!("Embedding dim = {}", vectors[0].len());
//! # Ok(()) }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{Candidate, gemini_service::GeminiService, ollama_service::OllamaService},
};

/// Shared service that manages the **generation** and **embedding** profiles.
///
/// Internally, it caches Gemini/Ollama clients keyed by their configuration to
/// avoid recreating HTTP clients on each call.
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    gemini: RwLock<HashMap<ClientKey, Arc<GeminiService>>>,
    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// Clients are built eagerly so that invalid configs (missing key, bad
    /// endpoint) fail here instead of on the first request.
    pub fn new(
        generation: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let mut gemini = HashMap::new();
        let mut ollama = HashMap::new();
        for cfg in [&generation, &embedding] {
            let key = ClientKey::from(cfg);
            match cfg.provider {
                LlmProvider::Gemini if !gemini.contains_key(&key) => {
                    gemini.insert(key, Arc::new(GeminiService::new(cfg.clone())?));
                }
                LlmProvider::Ollama if !ollama.contains_key(&key) => {
                    ollama.insert(key, Arc::new(OllamaService::new(cfg.clone())?));
                }
                _ => {}
            }
        }

        Ok(Self {
            generation,
            embedding,
            gemini: RwLock::new(gemini),
            ollama: RwLock::new(ollama),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Generates candidates for `prompt` using the **generation** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider call fails.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<Candidate>, AiLlmError> {
        let cfg = &self.generation;
        match cfg.provider {
            LlmProvider::Gemini => self.gemini_for(cfg).await?.generate(prompt).await,
            LlmProvider::Ollama => self.ollama_for(cfg).await?.generate(prompt).await,
        }
    }

    /// Computes one embedding per input using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider call fails.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        let cfg = &self.embedding;
        match cfg.provider {
            LlmProvider::Gemini => self.gemini_for(cfg).await?.embed_batch(texts).await,
            LlmProvider::Ollama => self.ollama_for(cfg).await?.embed_batch(texts).await,
        }
    }

    /// Returns a health snapshot for all distinct profiles.
    ///
    /// If both profiles share a config, it is checked only once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = Vec::<LlmModelConfig>::with_capacity(2);
        list.push(self.generation.clone());
        if self.embedding != self.generation {
            list.push(self.embedding.clone());
        }
        self.health.check_many(&list).await
    }

    /* --------------------- Internals --------------------- */

    async fn gemini_for(&self, cfg: &LlmModelConfig) -> Result<Arc<GeminiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.gemini.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.gemini.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(GeminiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn ollama_for(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}
