//! Streaming progress indicator.

use leptos::prelude::*;

/// Pulsing-dots indicator shown while a response stream is in flight.
///
/// The indicator is correlated with a stream through its identifier: the
/// element id is derived from the stream id, so a client observing stream
/// lifecycle events can address the indicator for the stream it cares about.
#[component]
pub fn StreamingIndicator(
    /// Stream identifier this indicator correlates with.
    #[prop(into)]
    id: String,
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
) -> impl IntoView {
    let element_id = format!("stream-indicator-{id}");
    let classes = format!("inline-flex items-center gap-0.5 {class}");

    view! {
        <span
            id=element_id
            class=classes
            data-stream-id=id
            role="status"
            aria-label="Generating response"
        >
            <span class="h-1.5 w-1.5 rounded-full bg-primary animate-bounce"></span>
            <span class="h-1.5 w-1.5 rounded-full bg-primary animate-bounce [animation-delay:150ms]"></span>
            <span class="h-1.5 w-1.5 rounded-full bg-primary animate-bounce [animation-delay:300ms]"></span>
        </span>
    }
}
