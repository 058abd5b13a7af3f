//! UI components and layouts.
//!
//! This module provides Leptos SSR components for rendering the application:
//! the page shell, the chat layout, and the conversation view itself. All
//! markup is produced on the server; HTMX and Alpine attributes emitted with
//! the markup wire up the client behavior (form submission, SSE swaps,
//! auto-scroll).
//!
//! # Structure
//!
//! - [`page`]: full-document shell
//! - [`chat`]: chat layout and the conversation view
//! - [`components`]: reusable ShadCN-style UI components

pub mod chat;
pub mod components;
pub mod page;
