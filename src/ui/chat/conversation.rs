//! Conversation message view.
//!
//! Maps an ordered list of [`ChatMessage`] records plus an optional
//! in-progress streaming buffer to markup. Prompts are right-aligned,
//! responses and errors render in the muted panel style, and content goes
//! through the memoized markdown renderer keyed by each message's rendering
//! key. While a stream is in flight, a [`StreamingIndicator`] sits next to
//! the trailing prompt and the accumulated buffer renders as a trailing
//! response-styled bubble.

use std::sync::Arc;

use leptos::prelude::*;

use crate::markdown::MarkdownCache;
use crate::message::{ChatMessage, MessageKind};

use super::StreamingIndicator;

/// Placeholder shown when the conversation has no messages yet.
const EMPTY_PLACEHOLDER: &str = "Type your message below and hit enter to send.";

/// Server-rendered conversation view.
#[component]
pub fn Conversation(
    /// Ordered message records.
    messages: Vec<ChatMessage>,
    /// Memoized markdown renderer.
    markdown: Arc<MarkdownCache>,
    /// In-progress streaming buffer, rendered as a trailing bubble when
    /// non-empty.
    streaming_data: Option<String>,
    /// Whether a response stream is currently in flight.
    is_streaming: bool,
    /// Identifier correlating the progress indicator with the stream.
    stream_id: Option<String>,
) -> impl IntoView {
    let count = messages.len();
    let empty = messages.is_empty();

    let bubbles = messages
        .into_iter()
        .enumerate()
        .map(|(index, message)| {
            message_bubble(&markdown, message, index, count, stream_id.as_deref())
        })
        .collect_view();

    let streaming_bubble = streaming_data.filter(|data| !data.is_empty()).map(|data| {
        let key = format!("streaming-{}", stream_id.clone().unwrap_or_default());
        let html = markdown.render(&key, &data);
        view! {
            <div class="relative">
                <div data-key=key class="bg-panel inline-block max-w-[80%] rounded-lg p-3">
                    <div class="prose dark:prose-invert whitespace-pre-wrap" inner_html=html></div>
                </div>
            </div>
        }
    });

    let placeholder = empty.then(|| {
        view! {
            <p class="text-textMuted mt-8 text-center">{EMPTY_PLACEHOLDER}</p>
        }
    });

    let busy = if is_streaming { "true" } else { "false" };

    view! {
        <div class="mx-auto max-w-3xl space-y-4 p-4" aria-busy=busy>
            {placeholder}
            {bubbles}
            {streaming_bubble}
        </div>
    }
}

/// Render the conversation view to an HTML fragment string.
///
/// This is the entry point used by fragment and SSE handlers; each call is a
/// full re-render driven by the current message list and streaming buffer.
#[must_use]
pub fn render_conversation(
    markdown: &Arc<MarkdownCache>,
    messages: Vec<ChatMessage>,
    streaming_data: Option<String>,
    is_streaming: bool,
    stream_id: Option<String>,
) -> String {
    let markdown = Arc::clone(markdown);
    view! {
        <Conversation
            messages=messages
            markdown=markdown
            streaming_data=streaming_data
            is_streaming=is_streaming
            stream_id=stream_id
        />
    }
    .to_html()
}

/// Render a single message bubble.
///
/// The wrapper carries the message's rendering key in `data-key` (keys embed
/// content prefixes, so they are not valid element ids); the key doubles as
/// the markdown memo key, so unchanged messages cost a cache lookup on
/// re-render. The indicator attaches only to a prompt in the last or
/// second-to-last position, and only while a stream id is known.
fn message_bubble(
    markdown: &MarkdownCache,
    message: ChatMessage,
    index: usize,
    count: usize,
    stream_id: Option<&str>,
) -> impl IntoView + use<> {
    let key = message.render_key(index);
    let html = markdown.render(&key, &message.content);
    let kind = message.kind.as_str();

    let is_prompt = message.kind == MessageKind::Prompt;
    let wrapper_classes = if is_prompt {
        "relative flex justify-end"
    } else {
        "relative"
    };
    let bubble_classes = if is_prompt {
        "inline-block max-w-[80%] rounded-lg p-3 bg-primary text-white"
    } else {
        "inline-block max-w-[80%] rounded-lg p-3 bg-panel text-textPrimary"
    };
    let prose_classes = if message.kind == MessageKind::Response {
        "prose dark:prose-invert whitespace-pre-wrap"
    } else {
        "prose not-dark:prose-invert whitespace-pre-wrap"
    };

    let near_tail = index + 2 >= count;
    let indicator = stream_id.filter(|_| is_prompt && near_tail).map(|id| {
        view! {
            <StreamingIndicator id=id.to_string() class="absolute top-3 -left-8" />
        }
    });

    view! {
        <div data-key=key data-kind=kind class=wrapper_classes>
            <div class=bubble_classes>
                {indicator}
                <div class=prose_classes inner_html=html></div>
            </div>
        </div>
    }
}
