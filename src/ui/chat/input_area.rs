//! Chat input area component.

use leptos::prelude::*;

use crate::ui::components::{Button, ButtonSize, ButtonVariant, SendIcon};

/// Chat message input area with HTMX form submission.
///
/// Submitting posts the message and swaps the response into the stream
/// mount, where it connects the SSE listener for the new response. The
/// hidden conversation-id input is filled in out-of-band by the first
/// response.
#[component]
pub fn ChatInputArea() -> impl IntoView {
    view! {
        <div class="border-t border-panelBorder p-4 bg-panel/50 backdrop-blur-sm">
            <form
                class="flex gap-2"
                hx-post="/api/chat"
                hx-trigger="submit"
                hx-target="#stream-mount"
                hx-swap="innerHTML"
                hx-on--after-request="if (event.detail.successful) this.reset()"
                x-data="{ message: '' }"
            >
                <input type="hidden" id="conversation-id" name="conversation_id" value="" />

                <div class="flex-1 relative">
                    <textarea
                        name="message"
                        placeholder="Type your message..."
                        class="w-full min-h-[44px] max-h-[200px] px-4 py-3 pr-12 rounded-xl \
                               border border-panelBorder bg-background text-textPrimary \
                               placeholder:text-textMuted resize-none \
                               focus:outline-none focus:ring-2 focus:ring-primary focus:border-transparent"
                        rows="1"
                        x-model="message"
                        x-on:keydown.enter.prevent="if (!$event.shiftKey && message.trim()) { $el.form.requestSubmit() }"
                        x-on:input="$el.style.height = 'auto'; $el.style.height = Math.min($el.scrollHeight, 200) + 'px'"
                        required
                    />
                </div>

                <Button
                    variant=ButtonVariant::Primary
                    size=ButtonSize::Icon
                    button_type="submit"
                    class="shrink-0 h-11 w-11 rounded-xl"
                >
                    <SendIcon class="h-5 w-5" />
                </Button>
            </form>

            <p class="text-xs text-textMuted mt-2 text-center">
                "Press Enter to send, Shift+Enter for new line"
            </p>
        </div>
    }
}
