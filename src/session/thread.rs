//! Conversation threads and their store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::message::ChatMessage;

/// Default conversation timeout (30 minutes).
const DEFAULT_CONVERSATION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A single conversation thread.
///
/// Threads hold the ordered message history and provide methods for
/// appending messages and persisting them (assigning identifiers).
#[derive(Debug)]
pub struct Conversation {
    inner: Arc<ConversationInner>,
}

#[derive(Debug)]
struct ConversationInner {
    /// Unique conversation identifier.
    id: String,
    /// Ordered messages.
    messages: RwLock<Vec<ChatMessage>>,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Last activity time.
    last_activity: RwLock<DateTime<Utc>>,
    /// Store-wide message id allocator; plays the autoincrement column.
    next_message_id: Arc<AtomicI64>,
}

impl Clone for Conversation {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Conversation {
    /// Create a new conversation with the given id and id allocator.
    fn new(id: String, next_message_id: Arc<AtomicI64>) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(ConversationInner {
                id,
                messages: RwLock::new(Vec::new()),
                created_at: now,
                last_activity: RwLock::new(now),
                next_message_id,
            }),
        }
    }

    /// Get the conversation id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Append an unsaved prompt message.
    pub fn push_prompt(&self, content: impl Into<String>) {
        self.push_message(ChatMessage::prompt(content));
    }

    /// Append an unsaved response message.
    pub fn push_response(&self, content: impl Into<String>) {
        self.push_message(ChatMessage::response(content));
    }

    /// Append an unsaved error message.
    pub fn push_error(&self, content: impl Into<String>) {
        self.push_message(ChatMessage::error(content));
    }

    /// Append a message to the thread.
    pub fn push_message(&self, message: ChatMessage) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.push(message);
        drop(guard);
        self.touch();
    }

    /// Assign identifiers to every unsaved message, in order.
    ///
    /// Each unsaved message receives the next id from the store-wide
    /// allocator and its `saved` flag flips, replacing the position-based
    /// rendering key with a stable `db-` key. Returns the number of messages
    /// persisted.
    pub fn persist_pending(&self) -> usize {
        let mut guard = self.inner.messages.write().unwrap();
        let mut persisted = 0;
        for message in guard.iter_mut().filter(|m| m.id.is_none()) {
            let id = self.inner.next_message_id.fetch_add(1, Ordering::Relaxed);
            message.persist(id);
            persisted += 1;
        }
        drop(guard);
        if persisted > 0 {
            self.touch();
        }
        persisted
    }

    /// Snapshot of all messages in the thread.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.messages.read().unwrap().clone()
    }

    /// Number of messages in the thread.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner.messages.read().unwrap().len()
    }

    /// Clear all messages.
    #[allow(dead_code)]
    pub fn clear(&self) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.clear();
        drop(guard);
        self.touch();
    }

    /// Update the last activity timestamp.
    fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }

    /// Check if the conversation has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_with_timeout(DEFAULT_CONVERSATION_TIMEOUT)
    }

    /// Check if the conversation has expired with a custom timeout.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self.inner.last_activity.read().unwrap();
        let now = Utc::now();
        if let Ok(duration) = (now - last).to_std() {
            duration > timeout
        } else {
            // Negative duration means clock skew or "last" is in future.
            false
        }
    }

    /// Get the conversation age.
    #[must_use]
    #[allow(dead_code)]
    pub fn age(&self) -> Duration {
        let now = Utc::now();
        (now - self.inner.created_at)
            .to_std()
            .unwrap_or(Duration::from_secs(0))
    }
}

/// Thread-safe store for conversations.
///
/// Provides methods for creating, retrieving, and cleaning up conversations,
/// and owns the message id allocator shared by every thread.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    inner: Arc<ConversationStoreInner>,
}

#[derive(Debug)]
struct ConversationStoreInner {
    conversations: RwLock<HashMap<String, Conversation>>,
    next_message_id: Arc<AtomicI64>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create a new conversation store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ConversationStoreInner {
                conversations: RwLock::new(HashMap::new()),
                next_message_id: Arc::new(AtomicI64::new(1)),
            }),
        }
    }

    /// Create a new conversation and return it.
    #[must_use]
    pub fn create(&self) -> Conversation {
        let id = Uuid::new_v4().to_string();
        self.create_with_id(id)
    }

    /// Create a new conversation with a specific id.
    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> Conversation {
        let id = id.into();
        let conversation = Conversation::new(id.clone(), Arc::clone(&self.inner.next_message_id));
        let mut guard = self.inner.conversations.write().unwrap();
        guard.insert(id, conversation.clone());
        conversation
    }

    /// Get a conversation by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Conversation> {
        let guard = self.inner.conversations.read().unwrap();
        guard.get(id).cloned()
    }

    /// Get a conversation by id, creating it if it doesn't exist.
    #[must_use]
    pub fn get_or_create(&self, id: &str) -> Conversation {
        // Try read-only first
        {
            let guard = self.inner.conversations.read().unwrap();
            if let Some(conversation) = guard.get(id) {
                return conversation.clone();
            }
        }

        self.create_with_id(id)
    }

    /// Remove a conversation by id.
    pub fn remove(&self, id: &str) -> Option<Conversation> {
        let mut guard = self.inner.conversations.write().unwrap();
        guard.remove(id)
    }

    /// Number of active conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.conversations.read().unwrap().len()
    }

    /// Check if there are no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all expired conversations.
    ///
    /// Returns the number of conversations removed.
    #[allow(dead_code)]
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_with_timeout(DEFAULT_CONVERSATION_TIMEOUT)
    }

    /// Remove conversations inactive longer than the timeout.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.conversations.write().unwrap();
        let before = guard.len();
        guard.retain(|_, conversation| !conversation.is_expired_with_timeout(timeout));
        before - guard.len()
    }

    /// List all conversation ids.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.inner
            .conversations
            .read()
            .unwrap()
            .keys()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn test_conversation_lifecycle() {
        let store = ConversationStore::new();
        let conversation = store.create_with_id("test-123");

        assert_eq!(conversation.id(), "test-123");
        assert_eq!(conversation.message_count(), 0);

        conversation.push_prompt("Hello");
        assert_eq!(conversation.message_count(), 1);

        conversation.push_response("Hi there!");
        assert_eq!(conversation.message_count(), 2);

        let messages = conversation.messages();
        assert_eq!(messages[0].kind, MessageKind::Prompt);
        assert_eq!(messages[1].kind, MessageKind::Response);
    }

    #[test]
    fn test_persist_pending_assigns_ordered_ids() {
        let store = ConversationStore::new();
        let conversation = store.create();

        conversation.push_prompt("one");
        conversation.push_response("two");
        assert!(conversation.messages().iter().all(|m| m.id.is_none()));

        assert_eq!(conversation.persist_pending(), 2);
        let messages = conversation.messages();
        assert_eq!(messages[0].id, Some(1));
        assert_eq!(messages[1].id, Some(2));
        assert!(messages.iter().all(|m| m.saved));

        // Already-persisted messages keep their ids.
        conversation.push_prompt("three");
        assert_eq!(conversation.persist_pending(), 1);
        let messages = conversation.messages();
        assert_eq!(messages[0].id, Some(1));
        assert_eq!(messages[2].id, Some(3));
    }

    #[test]
    fn test_ids_unique_across_conversations() {
        let store = ConversationStore::new();
        let a = store.create();
        let b = store.create();

        a.push_prompt("a");
        b.push_prompt("b");
        let _ = a.persist_pending();
        let _ = b.persist_pending();

        let id_a = a.messages()[0].id.unwrap();
        let id_b = b.messages()[0].id.unwrap();
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn test_store_crud() {
        let store = ConversationStore::new();

        assert!(store.is_empty());

        let conversation = store.create();
        assert_eq!(store.len(), 1);

        let retrieved = store.get(conversation.id()).unwrap();
        assert_eq!(retrieved.id(), conversation.id());

        let same = store.get_or_create(conversation.id());
        assert_eq!(store.len(), 1);
        assert_eq!(same.id(), conversation.id());

        store.remove(conversation.id());
        assert!(store.is_empty());
    }

    #[test]
    fn test_cleanup_expired() {
        let store = ConversationStore::new();
        let conversation = store.create();
        conversation.push_prompt("hi");

        // Nothing is expired with a generous timeout.
        assert_eq!(
            store.cleanup_expired_with_timeout(Duration::from_secs(3600)),
            0
        );
        // Everything is expired with a zero timeout.
        assert_eq!(store.cleanup_expired_with_timeout(Duration::ZERO), 1);
        assert!(store.is_empty());
    }
}
