//! Service adapters: OS specific implementations (filesystem, settings, paths).

pub mod backup;
pub mod file;
pub mod keybinding;
pub mod scripted;
pub mod settings;

pub use backup::{backup_file_path, ensure_backup_dir, ensure_log_dir, write_backup, AppDirs};
pub use file::LocalFileProvider;
pub use keybinding::{KeybindingContext, KeybindingService};
pub use scripted::{Prompt, ScriptedDialogs};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, parse_keybinding,
};
