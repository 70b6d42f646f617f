use thiserror::Error;

/// Failures talking to the chat endpoint.
///
/// None of these are shown verbatim to the user; the session replaces them
/// with a generic apology and logs the detail.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client build failed: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("chat endpoint returned {status}: {snippet}")]
    Status { status: u16, snippet: String },

    #[error("invalid chat response: {0}")]
    Decode(String),
}
