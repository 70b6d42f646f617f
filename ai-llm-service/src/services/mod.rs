pub mod gemini_service;
pub mod ollama_service;

/// One generated text option returned by a generation call.
///
/// Providers that produce a single completion (Ollama) return exactly one
/// candidate; Gemini may return several, or none when the prompt is blocked.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Generated text; may be empty.
    pub text: String,
    /// Provider-reported finish reason (`STOP`, `SAFETY`, ...), if any.
    pub finish_reason: Option<String>,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
        }
    }
}
