//! Default model configs loaded from environment variables.
//!
//! Two roles are supported:
//!
//! - **Generation** → answers the assembled prompt
//! - **Embedding**  → turns questions and review comments into vectors
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = generation provider (`gemini` default, or `ollama`)
//! - `EMBEDDING_KIND` = embedding provider (defaults to `LLM_KIND`)
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`, `EMBEDDING_TIMEOUT_SECS` = request timeouts
//!
//! Gemini-specific:
//! - `GOOGLE_API_KEY` (mandatory)
//! - `GEMINI_URL` (default `https://generativelanguage.googleapis.com`)
//! - `GEMINI_MODEL` (default `gemini-1.5-flash`)
//! - `GEMINI_EMBEDDING_MODEL` (default `text-embedding-004`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = generation model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_opt_u64, must_env, opt_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Generation config from the process environment.
pub fn generation_config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    generation_config_with(&|k: &str| std::env::var(k).ok())
}

/// Embedding config from the process environment.
pub fn embedding_config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    embedding_config_with(&|k: &str| std::env::var(k).ok())
}

/// Builds the **generation** profile from `lookup`.
///
/// # Defaults
/// - `temperature = Some(0.7)`
/// - `timeout_secs = Some(60)`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if the provider credential/model is absent
/// - [`ConfigError::UnsupportedProvider`] for unknown `LLM_KIND`
pub fn generation_config_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = provider_from(lookup, "LLM_KIND")?.unwrap_or(LlmProvider::Gemini);
    let max_tokens = env_opt_u32(lookup, "LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(60);

    let (model, endpoint, api_key) = match provider {
        LlmProvider::Gemini => (
            opt_env(lookup, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            gemini_endpoint(lookup)?,
            Some(must_env(lookup, "GOOGLE_API_KEY")?),
        ),
        LlmProvider::Ollama => (
            must_env(lookup, "OLLAMA_MODEL")?,
            ollama_endpoint(lookup)?,
            None,
        ),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(0.7),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

/// Builds the **embedding** profile from `lookup`.
///
/// `EMBEDDING_KIND` falls back to `LLM_KIND`, then to Gemini.
///
/// # Defaults
/// - `temperature = Some(0.0)` (unused by embedding endpoints, kept deterministic)
/// - `timeout_secs = Some(30)`
pub fn embedding_config_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match provider_from(lookup, "EMBEDDING_KIND")? {
        Some(p) => p,
        None => provider_from(lookup, "LLM_KIND")?.unwrap_or(LlmProvider::Gemini),
    };
    let timeout_secs = env_opt_u64(lookup, "EMBEDDING_TIMEOUT_SECS")?.unwrap_or(30);

    let (model, endpoint, api_key) = match provider {
        LlmProvider::Gemini => (
            opt_env(lookup, "GEMINI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_EMBEDDING_MODEL.into()),
            gemini_endpoint(lookup)?,
            Some(must_env(lookup, "GOOGLE_API_KEY")?),
        ),
        LlmProvider::Ollama => (
            must_env(lookup, "EMBEDDING_MODEL")?,
            ollama_endpoint(lookup)?,
            None,
        ),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

fn provider_from<F>(lookup: &F, var: &'static str) -> Result<Option<LlmProvider>, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    match opt_env(lookup, var) {
        Some(raw) => Ok(Some(raw.parse::<LlmProvider>()?)),
        None => Ok(None),
    }
}

fn gemini_endpoint<F>(lookup: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = opt_env(lookup, "GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.into());
    validate_http_endpoint("GEMINI_URL", &url)?;
    Ok(url)
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint<F>(lookup: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = opt_env(lookup, "OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_env(lookup, "OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn gemini_is_the_default_generation_provider() {
        let cfg = generation_config_with(&env(&[("GOOGLE_API_KEY", "g-key")])).unwrap();
        assert_eq!(cfg.provider, LlmProvider::Gemini);
        assert_eq!(cfg.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_GEMINI_URL);
        assert_eq!(cfg.api_key.as_deref(), Some("g-key"));
        assert_eq!(cfg.timeout_secs, Some(60));
    }

    #[test]
    fn missing_google_key_is_a_config_error() {
        let err = generation_config_with(&env(&[])).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("GOOGLE_API_KEY"))
        ));
    }

    #[test]
    fn embedding_kind_falls_back_to_llm_kind() {
        let cfg = embedding_config_with(&env(&[
            ("LLM_KIND", "ollama"),
            ("OLLAMA_PORT", "11434"),
            ("EMBEDDING_MODEL", "nomic-embed-text"),
        ]))
        .unwrap();
        assert_eq!(cfg.provider, LlmProvider::Ollama);
        assert_eq!(cfg.endpoint, "http://localhost:11434");
        assert_eq!(cfg.model, "nomic-embed-text");
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn embedding_kind_overrides_llm_kind() {
        let cfg = embedding_config_with(&env(&[
            ("LLM_KIND", "ollama"),
            ("EMBEDDING_KIND", "gemini"),
            ("GOOGLE_API_KEY", "g-key"),
        ]))
        .unwrap();
        assert_eq!(cfg.provider, LlmProvider::Gemini);
        assert_eq!(cfg.model, DEFAULT_GEMINI_EMBEDDING_MODEL);
    }

    #[test]
    fn rejects_non_http_gemini_url() {
        let err = generation_config_with(&env(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("GEMINI_URL", "ftp://example.org"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("GEMINI_URL"));
    }

    #[test]
    fn invalid_ollama_port_is_reported() {
        let err = generation_config_with(&env(&[
            ("LLM_KIND", "ollama"),
            ("OLLAMA_MODEL", "llama3.2"),
            ("OLLAMA_PORT", "99999"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("OLLAMA_PORT"));
    }
}
