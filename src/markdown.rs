//! Markdown rendering with per-key memoization.
//!
//! Message content is markdown and every conversation re-render would
//! otherwise re-parse every message. [`MarkdownCache`] memoizes the rendered
//! HTML per rendering key (see [`crate::message::ChatMessage::render_key`])
//! and re-renders only when the content behind a key changes — which is
//! exactly what happens to the streaming bubble as deltas accumulate.
//!
//! # Example
//!
//! ```rust
//! use colloquy::markdown::MarkdownCache;
//!
//! let cache = MarkdownCache::new();
//! let html = cache.render("db-1", "**bold**");
//! assert!(html.contains("<strong>bold</strong>"));
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use pulldown_cmark::{Options, Parser, html};

/// Render markdown to an HTML fragment.
///
/// Tables and strikethrough are enabled; raw HTML passes through the parser's
/// default handling.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(content, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Cached render for a single key.
#[derive(Debug, Clone)]
struct CachedRender {
    content: String,
    html: String,
}

/// Memoizing markdown renderer keyed by message rendering key.
#[derive(Debug, Default)]
pub struct MarkdownCache {
    entries: RwLock<HashMap<String, CachedRender>>,
}

impl MarkdownCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `content` under `key`, reusing the cached HTML when the content
    /// is unchanged.
    #[must_use]
    pub fn render(&self, key: &str, content: &str) -> String {
        {
            let guard = self.entries.read().unwrap();
            if let Some(cached) = guard.get(key)
                && cached.content == content
            {
                return cached.html.clone();
            }
        }

        let html = render_markdown(content);
        let mut guard = self.entries.write().unwrap();
        guard.insert(
            key.to_string(),
            CachedRender {
                content: content.to_string(),
                html: html.clone(),
            },
        );
        html
    }

    /// Drop a cached entry, e.g. when a local key is superseded by a db key.
    pub fn evict(&self, key: &str) {
        let mut guard = self.entries.write().unwrap();
        guard.remove(key);
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Check whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all cached entries.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_basic_markdown() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_renders_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_cache_hit_on_unchanged_content() {
        let cache = MarkdownCache::new();
        let first = cache.render("db-1", "hello");
        let second = cache.render("db-1", "hello");
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_rerenders_on_changed_content() {
        let cache = MarkdownCache::new();
        let first = cache.render("streaming-abc", "partial");
        let second = cache.render("streaming-abc", "partial response");
        assert_ne!(first, second);
        assert!(second.contains("partial response"));
        // Still a single entry: the key was overwritten, not duplicated.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_and_clear() {
        let cache = MarkdownCache::new();
        let _ = cache.render("a", "x");
        let _ = cache.render("b", "y");
        cache.evict("a");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
