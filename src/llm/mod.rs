//! Chat backend trait and implementations.
//!
//! A [`ChatBackend`] turns an outbound message history into a stream of
//! [`ChatEvent`]s. The only shipped implementation speaks the
//! OpenAI-compatible Chat Completions API; tests substitute scripted
//! backends through the same trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use colloquy::llm::{ChatCompletionsBackend, LlmSettings};
//!
//! let settings = LlmSettings {
//!     base_url: "https://api.openai.com".to_string(),
//!     api_key: Some("sk-...".to_string()),
//!     model: "gpt-4o".to_string(),
//! };
//! let backend = ChatCompletionsBackend::new(settings);
//! ```

pub mod chat_completions;

pub use chat_completions::ChatCompletionsBackend;

use std::pin::Pin;

use futures::Stream;
use serde::Serialize;

use crate::events::ChatEvent;
use crate::message::{ChatMessage, MessageKind};

/// LLM connection and model settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g., `gpt-4o`).
    pub model: String,
}

/// Errors produced by a chat backend.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request failed or returned a non-success status.
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// A stream frame did not parse as the expected JSON payload.
    #[error("malformed stream payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Boxed stream of chat events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ChatEvent, LlmError>> + Send>>;

/// A message in the shape the model API expects.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    /// API role (`user` or `assistant`).
    pub role: &'static str,
    /// Message content.
    pub content: String,
}

/// Map conversation history to outbound messages.
///
/// Prompts become `user` messages and responses become `assistant` messages.
/// Error records are conversation-local and are never replayed to the model.
#[must_use]
pub fn outbound_history(messages: &[ChatMessage]) -> Vec<OutboundMessage> {
    messages
        .iter()
        .filter_map(|m| {
            let role = match m.kind {
                MessageKind::Prompt => "user",
                MessageKind::Response => "assistant",
                MessageKind::Error => return None,
            };
            Some(OutboundMessage {
                role,
                content: m.content.clone(),
            })
        })
        .collect()
}

/// Trait for streaming chat backends.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stream a response for the given message history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be started; failures after the
    /// stream begins surface as `Err` items on the stream itself.
    async fn stream(&self, messages: Vec<OutboundMessage>) -> Result<EventStream, LlmError>;
}
