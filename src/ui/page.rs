//! Full-document page shell.

use leptos::prelude::*;

use crate::ui::chat::ChatShell;
use crate::ui::components::ChatBubbleIcon;

/// Render the chat page as a complete HTML document.
#[must_use]
pub fn render_document() -> String {
    view! { <Page /> }.to_html()
}

/// Main page component.
#[component]
pub fn Page() -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en" class="dark">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <meta name="description" content="Server-rendered streaming chat" />

                <title>"Colloquy"</title>

                // Local scripts only (no CDN)
                <script src="/static/vendor/htmx-2.0.8.min.js"></script>
                <script src="/static/vendor/htmx-sse.js"></script>
                <script defer src="/static/vendor/alpine.min.js"></script>
                <link rel="stylesheet" href="/static/app.css" />
            </head>

            <body class="min-h-screen bg-background text-textPrimary antialiased">
                <div id="app-shell" class="flex flex-col h-screen overflow-hidden">
                    <Header />
                    <main id="app" class="flex-1 overflow-hidden container mx-auto px-4 py-6 max-w-5xl">
                        <ChatShell title="Colloquy" />
                    </main>
                    <Footer />
                </div>
            </body>
        </html>
    }
}

/// Application header.
#[component]
fn Header() -> impl IntoView {
    view! {
        <header class="sticky top-0 z-50 w-full border-b border-panelBorder bg-background/95 backdrop-blur shrink-0">
            <div class="container mx-auto flex h-14 items-center justify-between px-4 max-w-5xl">
                <a href="/" class="flex items-center gap-2 font-semibold">
                    <ChatBubbleIcon class="h-5 w-5 text-primary" />
                    <span class="text-lg">"Colloquy"</span>
                </a>
            </div>
        </header>
    }
}

/// Footer component.
#[component]
fn Footer() -> impl IntoView {
    view! {
        <footer class="border-t border-panelBorder py-3 shrink-0 hidden md:block">
            <div class="container mx-auto px-4 max-w-5xl">
                <p class="text-xs text-textMuted text-center">
                    "Powered by Axum + Leptos + HTMX"
                </p>
            </div>
        </footer>
    }
}
