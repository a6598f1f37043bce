//! TUI integration layer (crossterm + ratatui).
//!
//! Kept apart from `kernel` so the controller can be driven headless
//! (tests, other frontends) without terminal crates.

pub mod app;
pub mod dialogs;
pub mod events;
pub mod render;
pub mod terminal_guard;
