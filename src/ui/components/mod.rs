//! ShadCN-style reusable UI components.
//!
//! A small set of composable components rendered via Leptos SSR, kept to
//! what the chat interface actually uses.
//!
//! # Components
//!
//! - [`Button`]: Clickable button with variants
//! - [`Badge`]: Status badge/tag
//! - [`icons`]: SVG icon components

mod badge;
mod button;
mod icons;

pub use badge::{Badge, BadgeVariant};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use icons::*;
