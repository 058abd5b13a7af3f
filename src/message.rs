//! Conversation message records.
//!
//! A [`ChatMessage`] is one entry in a conversation thread: a user prompt, an
//! assistant response, or an error surfaced inline. Messages start out
//! client-local (no identifier) and are replaced in place once the store
//! assigns a numeric identifier.
//!
//! # Example
//!
//! ```rust
//! use colloquy::message::{ChatMessage, MessageKind};
//!
//! let msg = ChatMessage::prompt("Hello!");
//! assert_eq!(msg.kind, MessageKind::Prompt);
//! assert_eq!(msg.render_key(0), "local-0-Hello!");
//! ```

use serde::{Deserialize, Serialize};

/// Number of leading characters mixed into the key of an unsaved message.
const KEY_PREFIX_CHARS: usize = 10;

/// Discriminant over the message variants a conversation can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// User prompt.
    Prompt,
    /// Assistant response.
    Response,
    /// Error surfaced inline in the conversation.
    Error,
}

impl MessageKind {
    /// Lowercase name as used in serialized payloads and DOM attributes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Response => "response",
            Self::Error => "error",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned identifier, absent until the message is persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Message variant.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Textual content (markdown).
    pub content: String,
    /// Whether the message has been persisted.
    #[serde(default)]
    pub saved: bool,
}

impl ChatMessage {
    /// Create an unsaved prompt message.
    #[must_use]
    pub fn prompt(content: impl Into<String>) -> Self {
        Self::unsaved(MessageKind::Prompt, content)
    }

    /// Create an unsaved response message.
    #[must_use]
    pub fn response(content: impl Into<String>) -> Self {
        Self::unsaved(MessageKind::Response, content)
    }

    /// Create an unsaved error message.
    #[must_use]
    pub fn error(content: impl Into<String>) -> Self {
        Self::unsaved(MessageKind::Error, content)
    }

    fn unsaved(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            content: content.into(),
            saved: false,
        }
    }

    /// Derive the rendering key for this message at the given list position.
    ///
    /// Persisted messages are keyed `db-{id}`. Unsaved messages are keyed by
    /// position plus a short content prefix so the key stays stable across
    /// re-renders until an identifier arrives, and never collides with a
    /// persisted key. The prefix is taken in characters, not bytes.
    #[must_use]
    pub fn render_key(&self, index: usize) -> String {
        match self.id {
            Some(id) => format!("db-{id}"),
            None => {
                let prefix: String = self.content.chars().take(KEY_PREFIX_CHARS).collect();
                format!("local-{index}-{prefix}")
            }
        }
    }

    /// Assign a server identifier, marking the message as persisted.
    pub fn persist(&mut self, id: i64) {
        self.id = Some(id);
        self.saved = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_key_uses_position_and_prefix() {
        let msg = ChatMessage::prompt("What is the capital of France?");
        assert_eq!(msg.render_key(3), "local-3-What is th");
    }

    #[test]
    fn test_persisted_key_uses_id() {
        let mut msg = ChatMessage::response("Paris.");
        msg.persist(42);
        assert_eq!(msg.render_key(0), "db-42");
        assert!(msg.saved);
    }

    #[test]
    fn test_key_prefix_counts_characters_not_bytes() {
        // 12 multibyte characters; byte slicing at 10 would split a codepoint
        let msg = ChatMessage::prompt("héllöwörldÿz");
        assert_eq!(msg.render_key(0), "local-0-héllöwörld");
    }

    #[test]
    fn test_short_content_key() {
        let msg = ChatMessage::prompt("hi");
        assert_eq!(msg.render_key(5), "local-5-hi");
    }

    #[test]
    fn test_serde_shape() {
        let mut msg = ChatMessage::error("backend unavailable");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["content"], "backend unavailable");
        assert!(json.get("id").is_none());

        msg.persist(7);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["saved"], true);
    }

    #[test]
    fn test_deserialize_without_saved_flag() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"type":"prompt","content":"hey"}"#).unwrap();
        assert_eq!(msg.kind, MessageKind::Prompt);
        assert!(!msg.saved);
        assert!(msg.id.is_none());
    }
}
