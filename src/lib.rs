//! Colloquy
//!
//! A server-rendered streaming chat application. Conversation markup is
//! produced on the server by Leptos SSR components and delivered as a full
//! page, as HTMX fragments, or as a stream of fragments over SSE while a
//! response is generated — the browser only swaps and scrolls.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server with SSE streaming
//! - **Conversation state**: in-memory thread store with server-assigned
//!   message identifiers
//! - **Chat backend**: OpenAI-compatible Chat Completions streaming client
//!   behind a trait
//! - **UI**: Leptos SSR + HTMX + Alpine.js, HTML-first and inspectable
//!
//! # Modules
//!
//! - [`message`]: conversation message records and rendering keys
//! - [`session`]: conversation threads and their store
//! - [`llm`]: chat backend trait and implementations
//! - [`events`]: normalized streaming event model
//! - [`markdown`]: memoized markdown rendering
//! - [`ui`]: server-side rendered view components
//! - [`server`]: router and handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::map_err_ignore)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod events;
pub mod llm;
pub mod markdown;
pub mod message;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::ChatBackend;
use crate::markdown::MarkdownCache;
use crate::session::ConversationStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat backend used to generate responses.
    pub backend: Arc<dyn ChatBackend>,
    /// Conversation store.
    pub conversations: ConversationStore,
    /// Memoized markdown renderer.
    pub markdown: Arc<MarkdownCache>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("conversations", &self.conversations)
            .field("config", &self.config)
            .finish()
    }
}
