//! Normalized events for streaming chat responses.
//!
//! The chat backend emits [`ChatEvent`]s as the model generates output. The
//! server folds message deltas into the streaming buffer that the
//! conversation view renders, and forwards lifecycle events to the client.
//!
//! # Example
//!
//! ```rust
//! use colloquy::events::ChatEvent;
//!
//! let event = ChatEvent::MessageDelta {
//!     text: "Hello".to_string(),
//! };
//! let json = serde_json::to_string(&event).unwrap();
//! assert!(json.contains("message.delta"));
//! ```

use serde::{Deserialize, Serialize};

/// Normalized streaming events emitted by a chat backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum ChatEvent {
    // ─────────────────────────────────────────────────────────────────────
    // Stream Lifecycle
    // ─────────────────────────────────────────────────────────────────────
    /// Indicates the start of a new streaming response.
    #[serde(rename = "stream.start")]
    StreamStart {
        /// Identifier correlating this stream with the progress indicator.
        stream_id: String,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Message Content
    // ─────────────────────────────────────────────────────────────────────
    /// Incremental text delta from the assistant's response.
    #[serde(rename = "message.delta")]
    MessageDelta {
        /// The text fragment to append.
        text: String,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Termination
    // ─────────────────────────────────────────────────────────────────────
    /// The stream failed; the message is surfaced inline in the conversation.
    #[serde(rename = "stream.error")]
    Error {
        /// Human-readable error description.
        message: String,
        /// Optional provider error code.
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// The stream completed.
    #[serde(rename = "stream.done")]
    Done,
}

impl ChatEvent {
    /// SSE event name for client-side routing.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::StreamStart { .. } => "stream-start",
            Self::MessageDelta { .. } => "delta",
            Self::Error { .. } => "error",
            Self::Done => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_delta_serialization() {
        let event = ChatEvent::MessageDelta {
            text: "Hello".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("message.delta"));
        assert!(json.contains("Hello"));
    }

    #[test]
    fn test_error_omits_missing_code() {
        let event = ChatEvent::Error {
            message: "boom".to_string(),
            code: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("stream.error"));
        assert!(!json.contains("code"));
    }

    #[test]
    fn test_roundtrip() {
        let event = ChatEvent::StreamStart {
            stream_id: "abc".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ChatEvent::Done.event_name(), "done");
        let delta = ChatEvent::MessageDelta {
            text: String::new(),
        };
        assert_eq!(delta.event_name(), "delta");
    }
}
