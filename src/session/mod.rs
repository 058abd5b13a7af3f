//! Conversation thread management.
//!
//! This module provides in-memory storage for conversation threads. Threads
//! are identified by UUID and hold the full message history; the store also
//! owns the allocator that hands out message identifiers when a thread is
//! persisted.
//!
//! # Architecture
//!
//! - [`Conversation`]: a single conversation thread
//! - [`ConversationStore`]: thread-safe store for all active conversations
//!
//! # Example
//!
//! ```rust
//! use colloquy::session::ConversationStore;
//!
//! let store = ConversationStore::new();
//! let conversation = store.create();
//! conversation.push_prompt("Hello!");
//!
//! assert_eq!(conversation.message_count(), 1);
//! assert_eq!(conversation.persist_pending(), 1);
//! ```

mod thread;

pub use thread::{Conversation, ConversationStore};
