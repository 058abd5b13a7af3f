//! Snapshot-level properties of the rendered conversation view.

use std::sync::Arc;

use colloquy::markdown::MarkdownCache;
use colloquy::message::ChatMessage;
use colloquy::ui::chat::render_conversation;

fn cache() -> Arc<MarkdownCache> {
    Arc::new(MarkdownCache::new())
}

fn render(
    messages: Vec<ChatMessage>,
    streaming_data: Option<&str>,
    is_streaming: bool,
    stream_id: Option<&str>,
) -> String {
    render_conversation(
        &cache(),
        messages,
        streaming_data.map(ToString::to_string),
        is_streaming,
        stream_id.map(ToString::to_string),
    )
}

fn persisted(mut message: ChatMessage, id: i64) -> ChatMessage {
    message.persist(id);
    message
}

#[test]
fn empty_conversation_shows_placeholder() {
    let html = render(vec![], None, false, None);
    assert!(html.contains("Type your message below and hit enter to send."));
}

#[test]
fn placeholder_absent_once_messages_exist() {
    let html = render(vec![ChatMessage::prompt("hi")], None, false, None);
    assert!(!html.contains("Type your message below and hit enter to send."));
}

#[test]
fn prompts_are_right_aligned() {
    let html = render(
        vec![ChatMessage::prompt("hi"), ChatMessage::response("hello")],
        None,
        false,
        None,
    );
    // Exactly one right-aligned wrapper: the prompt
    assert_eq!(html.matches("flex justify-end").count(), 1);
    assert!(html.contains(r#"data-kind="prompt""#));
    assert!(html.contains(r#"data-kind="response""#));
}

#[test]
fn unsaved_messages_use_positional_keys() {
    let html = render(
        vec![ChatMessage::prompt("What is Rust?")],
        None,
        false,
        None,
    );
    assert!(html.contains(r#"data-key="local-0-What is Ru""#));
}

#[test]
fn persisted_messages_use_db_keys() {
    let html = render(
        vec![
            persisted(ChatMessage::prompt("What is Rust?"), 11),
            persisted(ChatMessage::response("A systems language."), 12),
        ],
        None,
        false,
        None,
    );
    assert!(html.contains(r#"data-key="db-11""#));
    assert!(html.contains(r#"data-key="db-12""#));
    assert!(!html.contains(r#"data-key="local-"#));
}

#[test]
fn markdown_content_is_rendered() {
    let html = render(vec![ChatMessage::response("**bold** move")], None, false, None);
    assert!(html.contains("<strong>bold</strong>"));
}

#[test]
fn indicator_requires_stream_id() {
    let messages = vec![ChatMessage::prompt("hi")];
    let with_id = render(messages.clone(), None, true, Some("s-1"));
    let without_id = render(messages, None, true, None);

    assert!(with_id.contains("stream-indicator-s-1"));
    assert!(!without_id.contains("stream-indicator"));
}

#[test]
fn indicator_attaches_to_second_to_last_prompt() {
    // Prompt at index 0 of 2: second-to-last position
    let html = render(
        vec![ChatMessage::prompt("hi"), ChatMessage::response("partial")],
        None,
        true,
        Some("s-2"),
    );
    assert!(html.contains("stream-indicator-s-2"));
}

#[test]
fn indicator_skips_earlier_prompts() {
    // The only prompt sits at index 0 of 3: too far from the tail
    let html = render(
        vec![
            ChatMessage::prompt("hi"),
            ChatMessage::response("one"),
            ChatMessage::response("two"),
        ],
        None,
        true,
        Some("s-3"),
    );
    assert!(!html.contains("stream-indicator"));
}

#[test]
fn indicator_never_attaches_to_responses() {
    let html = render(
        vec![ChatMessage::response("hello")],
        None,
        true,
        Some("s-4"),
    );
    assert!(!html.contains("stream-indicator"));
}

#[test]
fn indicator_only_on_trailing_prompt_in_long_history() {
    let html = render(
        vec![
            persisted(ChatMessage::prompt("one"), 1),
            persisted(ChatMessage::response("two"), 2),
            ChatMessage::prompt("three"),
        ],
        None,
        true,
        Some("s-5"),
    );
    assert_eq!(html.matches("stream-indicator-s-5").count(), 1);
    // The indicator sits inside the trailing prompt's bubble
    let indicator_pos = html.find("stream-indicator-s-5").unwrap();
    let prompt_pos = html.find(r#"data-key="local-2-three""#).unwrap();
    assert!(indicator_pos > prompt_pos);
}

#[test]
fn streaming_buffer_renders_trailing_bubble() {
    let html = render(
        vec![ChatMessage::prompt("hi")],
        Some("Partial answer"),
        true,
        Some("s-6"),
    );
    assert!(html.contains(r#"data-key="streaming-s-6""#));
    assert!(html.contains("Partial answer"));
}

#[test]
fn empty_streaming_buffer_renders_no_bubble() {
    let html = render(vec![ChatMessage::prompt("hi")], Some(""), true, Some("s-7"));
    assert!(!html.contains("streaming-s-7"));
}

#[test]
fn no_streaming_bubble_without_buffer() {
    let html = render(vec![ChatMessage::prompt("hi")], None, false, None);
    assert!(!html.contains(r#"data-key="streaming-"#));
}

#[test]
fn streaming_flag_marks_container_busy() {
    let busy = render(vec![], None, true, None);
    let idle = render(vec![], None, false, None);
    assert!(busy.contains(r#"aria-busy="true""#));
    assert!(idle.contains(r#"aria-busy="false""#));
}

#[test]
fn rerender_is_stable_for_unchanged_messages() {
    let markdown = cache();
    let messages = vec![
        persisted(ChatMessage::prompt("hi"), 1),
        ChatMessage::response("hello"),
    ];
    let first = render_conversation(&markdown, messages.clone(), None, false, None);
    let second = render_conversation(&markdown, messages, None, false, None);
    assert_eq!(first, second);
}
