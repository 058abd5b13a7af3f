//! HTTP server: router, handlers, and the response streaming loop.
//!
//! The chat flow is HTML-first. `POST /api/chat` appends the prompt and
//! returns a fragment that mounts an SSE listener; `GET /api/chat/stream`
//! re-renders the conversation fragment for every accumulated delta and the
//! client swaps each frame into the conversation body. JSON endpoints cover
//! conversation management.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::config::AppConfig;
use crate::events::ChatEvent;
use crate::llm::{ChatCompletionsBackend, LlmSettings, outbound_history};
use crate::markdown::MarkdownCache;
use crate::message::ChatMessage;
use crate::session::{Conversation, ConversationStore};
use crate::ui::chat::render_conversation;
use crate::ui::page::render_document;

/// Start the server with the provided configuration.
pub async fn start(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        "LLM configuration loaded"
    );

    let state = AppState {
        backend: Arc::new(ChatCompletionsBackend::new(settings)),
        conversations: ConversationStore::new(),
        markdown: Arc::new(MarkdownCache::new()),
        config: Arc::clone(&config),
    };

    // Periodic expiry sweep
    let store = state.conversations.clone();
    let timeout = config.conversation.timeout();
    let sweep_interval = config.conversation.sweep_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let removed = store.cleanup_expired_with_timeout(timeout);
            if removed > 0 {
                tracing::debug!(removed, "Expired conversations removed");
            }
        }
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %format!("http://{addr}"),
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    // Management API gets a request timeout; the chat stream must not.
    let management = Router::new()
        .route(
            "/api/conversations",
            get(api_list_conversations).post(api_create_conversation),
        )
        .route(
            "/api/conversations/{id}",
            get(api_get_conversation).delete(api_delete_conversation),
        )
        .route("/api/conversations/{id}/messages", get(api_get_messages))
        .layer(TimeoutLayer::new(Duration::from_secs(10)));

    Router::new()
        // HTML pages and fragments
        .route("/", get(index_handler))
        .route("/fragments/conversation", get(conversation_fragment))
        // Chat API
        .route("/api/chat", post(api_chat))
        .route("/api/chat/stream", get(api_chat_stream))
        .merge(management)
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Index page handler.
async fn index_handler() -> Html<String> {
    Html(render_document())
}

/// Query parameters for the conversation fragment.
#[derive(Debug, Deserialize)]
struct FragmentQuery {
    /// Conversation to render; absent or unknown renders the placeholder.
    #[serde(default)]
    conversation_id: Option<String>,
}

/// GET /fragments/conversation - rendered conversation fragment.
async fn conversation_fragment(
    State(state): State<AppState>,
    Query(query): Query<FragmentQuery>,
) -> Html<String> {
    let messages = query
        .conversation_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .and_then(|id| state.conversations.get(id))
        .map(|c| c.messages())
        .unwrap_or_default();

    Html(render_conversation(
        &state.markdown,
        messages,
        None,
        false,
        None,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat API
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for the chat form.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// User message content.
    message: String,
    /// Optional conversation id (creates a new one if not provided).
    #[serde(default)]
    conversation_id: Option<String>,
}

/// POST /api/chat - append the prompt and mount a response stream.
///
/// The response fragment targets the stream mount and carries two
/// out-of-band swaps: the conversation body (so the prompt shows
/// immediately) and the hidden conversation-id input.
async fn api_chat(
    State(state): State<AppState>,
    Form(req): Form<ChatRequest>,
) -> Result<Html<String>, (StatusCode, String)> {
    // Form-submitted textareas use CRLF line endings
    let message = req.message.replace("\r\n", "\n").replace('\r', "");
    let message = message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "message cannot be empty".to_string(),
        ));
    }

    let conversation = match req.conversation_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => state.conversations.get_or_create(id),
        None => state.conversations.create(),
    };

    conversation.push_prompt(message);

    tracing::info!(
        conversation_id = %conversation.id(),
        message_count = conversation.message_count(),
        "Prompt added to conversation"
    );

    let conversation_id = conversation.id().to_string();
    let stream_url = format!("/api/chat/stream?conversation_id={conversation_id}");
    let conversation_html =
        render_conversation(&state.markdown, conversation.messages(), None, false, None);

    let fragment = format!(
        concat!(
            r##"<div hx-ext="sse" sse-connect="{stream_url}" sse-swap="conversation" "##,
            r##"sse-close="done" hx-target="#conversation-body" hx-swap="innerHTML"></div>"##,
            "\n",
            r##"<div id="conversation-body" hx-swap-oob="innerHTML">{conversation_html}</div>"##,
            "\n",
            r##"<input type="hidden" id="conversation-id" name="conversation_id" "##,
            r##"value="{conversation_id}" hx-swap-oob="true">"##,
        ),
        stream_url = stream_url,
        conversation_html = conversation_html,
        conversation_id = conversation_id,
    );

    Ok(Html(fragment))
}

/// Query parameters for the stream endpoint.
#[derive(Debug, Deserialize)]
struct StreamQuery {
    /// Conversation id.
    conversation_id: String,
}

/// GET /api/chat/stream - SSE stream of conversation fragments.
async fn api_chat_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Response {
    let Some(conversation) = state.conversations.get(&query.conversation_id) else {
        tracing::error!(conversation_id = %query.conversation_id, "Conversation not found");
        return (StatusCode::NOT_FOUND, "conversation not found").into_response();
    };

    let stream_id = Uuid::new_v4().to_string();
    let backend = Arc::clone(&state.backend);
    let markdown = Arc::clone(&state.markdown);

    info!(
        name: "chat.stream.started",
        conversation_id = %query.conversation_id,
        stream_id = %stream_id,
        message_count = conversation.message_count(),
        "Starting response stream"
    );

    let frames = async_stream::stream! {
        yield chat_event_frame(&ChatEvent::StreamStart {
            stream_id: stream_id.clone(),
        });

        // Indicator-only frame: the prompt is on screen and the stream id is
        // known before the first delta arrives.
        yield streaming_frame(&markdown, &conversation, None, &stream_id);

        let history = outbound_history(&conversation.messages());
        let mut stream = match backend.stream(history).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(stream_id = %stream_id, error = %e, "Failed to start chat backend");
                conversation.push_error(e.to_string());
                let _ = conversation.persist_pending();
                yield final_frame(&markdown, &conversation);
                yield chat_event_frame(&ChatEvent::Done);
                return;
            }
        };

        let mut buffer = String::new();
        let mut stream_error: Option<String> = None;
        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatEvent::MessageDelta { text }) => {
                    buffer.push_str(&text);
                    yield streaming_frame(&markdown, &conversation, Some(buffer.clone()), &stream_id);
                }
                Ok(ChatEvent::Error { message, code }) => {
                    tracing::error!(stream_id = %stream_id, error = %message, code = ?code, "Provider error frame");
                    stream_error = Some(message);
                    break;
                }
                Ok(ChatEvent::Done) => break,
                Ok(ChatEvent::StreamStart { .. }) => {}
                Err(e) => {
                    tracing::error!(stream_id = %stream_id, error = %e, "Stream error");
                    stream_error = Some(e.to_string());
                    break;
                }
            }
        }

        // Partial output survives a broken stream; the error follows it
        if !buffer.is_empty() {
            conversation.push_response(buffer);
        }
        if let Some(message) = stream_error {
            conversation.push_error(message);
        }
        let persisted = conversation.persist_pending();

        info!(
            name: "chat.stream.completed",
            conversation_id = %conversation.id(),
            stream_id = %stream_id,
            persisted,
            "Response stream completed"
        );

        yield final_frame(&markdown, &conversation);
        yield chat_event_frame(&ChatEvent::Done);
    };

    Sse::new(frames.map(Ok::<Event, Infallible>))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response()
}

/// Conversation frame while a stream is in flight.
fn streaming_frame(
    markdown: &Arc<MarkdownCache>,
    conversation: &Conversation,
    streaming_data: Option<String>,
    stream_id: &str,
) -> Event {
    let html = render_conversation(
        markdown,
        conversation.messages(),
        streaming_data,
        true,
        Some(stream_id.to_string()),
    );
    conversation_event(&html, "Streaming")
}

/// Conversation frame after the stream finished (or failed).
fn final_frame(markdown: &Arc<MarkdownCache>, conversation: &Conversation) -> Event {
    let html = render_conversation(markdown, conversation.messages(), None, false, None);
    conversation_event(&html, "Ready")
}

/// Build a `conversation` SSE event carrying the fragment plus the
/// out-of-band status badge update.
fn conversation_event(html: &str, status: &str) -> Event {
    let payload = format!(
        r##"{html}<span id="chat-status" class="text-xs" hx-swap-oob="true">{status}</span>"##
    );
    // SSE data fields cannot carry carriage returns
    Event::default()
        .event("conversation")
        .data(payload.replace('\r', ""))
}

/// Lifecycle SSE event carrying the serialized [`ChatEvent`].
///
/// The `done` event doubles as the close signal for the client's listener.
fn chat_event_frame(event: &ChatEvent) -> Event {
    let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.event_name()).data(json)
}

// ─────────────────────────────────────────────────────────────────────────────
// Management API
// ─────────────────────────────────────────────────────────────────────────────

/// Conversation info for listing.
#[derive(Debug, Serialize)]
struct ConversationInfo {
    id: String,
    message_count: usize,
}

/// GET /api/conversations - list all conversations.
async fn api_list_conversations(State(state): State<AppState>) -> Json<Vec<ConversationInfo>> {
    let conversations: Vec<ConversationInfo> = state
        .conversations
        .list_ids()
        .iter()
        .filter_map(|id| {
            state.conversations.get(id).map(|c| ConversationInfo {
                id: id.clone(),
                message_count: c.message_count(),
            })
        })
        .collect();

    Json(conversations)
}

/// POST /api/conversations - create a new conversation.
async fn api_create_conversation(State(state): State<AppState>) -> Json<ConversationInfo> {
    let conversation = state.conversations.create();
    Json(ConversationInfo {
        id: conversation.id().to_string(),
        message_count: 0,
    })
}

/// GET /api/conversations/:id - conversation details.
async fn api_get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationInfo>, StatusCode> {
    match state.conversations.get(&id) {
        Some(conversation) => Ok(Json(ConversationInfo {
            id: conversation.id().to_string(),
            message_count: conversation.message_count(),
        })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// DELETE /api/conversations/:id - delete a conversation.
async fn api_delete_conversation(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    match state.conversations.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// GET /api/conversations/:id/messages - conversation messages.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, StatusCode> {
    match state.conversations.get(&id) {
        Some(conversation) => Ok(Json(conversation.messages())),
        None => Err(StatusCode::NOT_FOUND),
    }
}
