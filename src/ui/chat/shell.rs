//! Chat shell layout component.

use leptos::prelude::*;

use super::{ChatHeader, ChatInputArea};

/// Main chat shell component.
///
/// Provides the complete chat interface layout with:
/// - Header with title and status badge
/// - Scrollable conversation area, loaded as a fragment and re-swapped while
///   streaming; the scroll offset pins to the bottom after every swap
/// - Input area for new messages
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <ChatShell title="Colloquy" />
/// }
/// ```
#[component]
pub fn ChatShell(
    /// Title displayed in the header.
    #[prop(default = "Chat")]
    title: &'static str,
) -> impl IntoView {
    view! {
        <div class="chat-shell flex flex-col h-[calc(100vh-6rem)] bg-panel border border-panelBorder rounded-2xl overflow-hidden">
            <ChatHeader title=title />

            <div
                id="conversation-scroll"
                class="flex-1 overflow-x-hidden overflow-y-auto"
                x-init="$el.scrollTop = $el.scrollHeight"
                hx-on--after-swap="this.scrollTop = this.scrollHeight"
            >
                <div
                    id="conversation-body"
                    hx-get="/fragments/conversation"
                    hx-trigger="load"
                    hx-swap="innerHTML"
                ></div>
            </div>

            // SSE listeners mount here, one per in-flight response
            <div id="stream-mount" class="hidden"></div>

            <ChatInputArea />
        </div>
    }
}
