//! Generative-AI client layer for HunterMatch.
//!
//! Wraps Gemini and Ollama behind two profiles (`generation`, `embedding`)
//! managed by [`LlmServiceProfiles`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
pub use services::Candidate;
