//! Headless application core: document state, text buffer, controllers.

pub mod buffer;
pub mod controller;
pub mod document;
pub mod menu;
pub mod services;

pub use buffer::TextBuffer;
pub use controller::{EditorController, EditorError, EditorOptions, Flow};
pub use document::DocumentState;
pub use menu::{Menu, MenuController, MenuItem};
