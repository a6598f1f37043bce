//! `settings.json` 的数据形状。每一节都可以省略，缺的字段取默认值。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    /// Copy the buffer aside before discarding unsaved changes.
    pub backup_on_discard: bool,
    /// Ask before exiting with unsaved changes.
    pub confirm_exit: bool,
    pub keybindings: Vec<KeybindingRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: EditorSettings::default(),
            backup_on_discard: true,
            confirm_exit: false,
            keybindings: Vec::new(),
        }
    }
}

/// `{ "key": "ctrl+w", "command": "exit" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindingRule {
    pub key: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub tab_size: u8,
    pub scroll_lines: usize,
    pub show_line_numbers: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            scroll_lines: 3,
            show_line_numbers: false,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
