//! HTTP transport to `POST /api/chat`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use ai_llm_service::error_handler::make_snippet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::ClientError;

/// Chat endpoint of a locally running server.
pub const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:3000/api/chat";

/// Response envelope of the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
}

/// Sends one question and yields the decoded envelope.
pub trait ChatTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChatReply, ClientError>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// # Errors
    /// [`ClientError::Build`] if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[instrument(skip_all, fields(url = %self.url, q_len = question.len()))]
    async fn post(&self, question: &str) -> Result<ChatReply, ClientError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&ChatRequest { question })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|source| ClientError::Transport {
            url: self.url.clone(),
            source,
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "chat response");

        // Failures are non-2xx; the envelope message is not trusted here.
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                snippet: make_snippet(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl ChatTransport for HttpTransport {
    fn send<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ChatReply, ClientError>> + Send + 'a>> {
        Box::pin(self.post(question))
    }
}
