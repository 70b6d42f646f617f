//! Terminal chat client for the HunterMatch API.
//!
//! [`ChatSession`] owns the visible conversation, [`ChatTransport`] carries a
//! question to `/api/chat`, [`render`] turns messages into terminal text, and
//! [`repl::run`] drives the interactive loop.

pub mod error;
pub mod render;
pub mod repl;
pub mod session;
pub mod transport;

pub use error::ClientError;
pub use session::{ChatMessage, ChatRole, ChatSession, FAILURE_TEXT, GREETING};
pub use transport::{ChatReply, ChatTransport, DEFAULT_CHAT_URL, HttpTransport};
