//! Conversation state shared by the terminal client and its tests.

use tracing::warn;

use crate::error::ClientError;
use crate::transport::ChatReply;

/// First bot message of every session.
pub const GREETING: &str = "Welcome to HunterMatch! How can I help you today?";

/// Bot message appended when a request fails for any reason.
pub const FAILURE_TEXT: &str = "Sorry, something went wrong.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn label(self) -> &'static str {
        match self {
            ChatRole::User => "Hunter Student",
            ChatRole::Bot => "Hunter bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            text: text.into(),
        }
    }
}

/// Ordered, append-only conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New session holding only the greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::bot(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Appends the user's message before any request is made.
    ///
    /// Returns the question to send, or `None` for empty input.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(input));
        Some(input.to_string())
    }

    /// Appends exactly one bot message for a finished request.
    pub fn apply_reply(&mut self, reply: Result<ChatReply, ClientError>) -> &ChatMessage {
        let text = match reply {
            Ok(ChatReply {
                success: true,
                data,
                ..
            }) => data.unwrap_or_default(),
            Ok(ChatReply {
                success: false,
                message,
                ..
            }) => match message {
                Some(m) if !m.trim().is_empty() => m,
                _ => FAILURE_TEXT.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "chat request failed");
                FAILURE_TEXT.to_string()
            }
        };
        self.messages.push(ChatMessage::bot(text));
        &self.messages[self.messages.len() - 1]
    }
}
