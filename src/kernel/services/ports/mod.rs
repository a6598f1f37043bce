//! Service ports: traits + data contracts.

pub mod dialog;
pub mod file;
pub mod settings;

pub use dialog::Dialogs;
pub use file::{FileError, FileProvider, Result as FileResult};
pub use settings::{EditorSettings, KeybindingRule, Settings};
