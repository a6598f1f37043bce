//! `settings.json` 的位置、加载，以及快捷键字符串解析
//!
//! 路径：`<cache_dir>/.simedit/settings.json`。文件缺失或格式错误时
//! 使用默认值，编辑器照常启动。

use crate::core::event::{Key, KeyCode, KeyModifiers};
use crate::kernel::services::ports::settings::Settings;
use std::io;
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = ".simedit";
const SETTINGS_FILE: &str = "settings.json";

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("enter", KeyCode::Enter),
    ("return", KeyCode::Enter),
    ("tab", KeyCode::Tab),
    ("backtab", KeyCode::BackTab),
    ("esc", KeyCode::Esc),
    ("escape", KeyCode::Esc),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("del", KeyCode::Delete),
    ("insert", KeyCode::Insert),
    ("up", KeyCode::Up),
    ("down", KeyCode::Down),
    ("left", KeyCode::Left),
    ("right", KeyCode::Right),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageup", KeyCode::PageUp),
    ("pagedown", KeyCode::PageDown),
    ("space", KeyCode::Char(' ')),
];

pub fn get_settings_path() -> Option<PathBuf> {
    cache_root().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Writes a file with the default settings if none exists yet.
pub fn ensure_settings_file() -> io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "cannot determine settings directory")
    })?;
    if path.exists() {
        return Ok(path);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let defaults = serde_json::to_string_pretty(&Settings::default())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    std::fs::write(&path, defaults)?;
    tracing::info!(path = %path.display(), "default settings written");
    Ok(path)
}

pub fn load_settings() -> Settings {
    get_settings_path()
        .map(|path| load_settings_from(&path))
        .unwrap_or_default()
}

pub fn load_settings_from(path: &Path) -> Settings {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "no settings, using defaults");
            return Settings::default();
        }
    };
    serde_json::from_str(&data).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "malformed settings, using defaults");
        Settings::default()
    })
}

/// Parses chords like `ctrl+shift+s`, `Alt+F` or `f10`. Case-insensitive;
/// an uppercase letter implies Shift.
pub fn parse_keybinding(value: &str) -> Option<Key> {
    let mut parts: Vec<&str> = value.split('+').map(str::trim).collect();
    let last = parts.pop().filter(|part| !part.is_empty())?;

    let mut modifiers = KeyModifiers::NONE;
    for part in parts {
        modifiers |= parse_modifier(part)?;
    }

    let (code, shifted) = parse_key_code(last)?;
    if shifted {
        modifiers |= KeyModifiers::SHIFT;
    }
    Some(Key::new(code, modifiers))
}

fn parse_modifier(name: &str) -> Option<KeyModifiers> {
    let modifier = match name.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => KeyModifiers::CONTROL,
        "shift" => KeyModifiers::SHIFT,
        "alt" | "option" => KeyModifiers::ALT,
        "super" | "meta" | "cmd" => KeyModifiers::SUPER,
        _ => return None,
    };
    Some(modifier)
}

/// Returns the key code and whether the spelling implied Shift.
fn parse_key_code(name: &str) -> Option<(KeyCode, bool)> {
    let lower = name.to_ascii_lowercase();
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(named, _)| *named == lower) {
        return Some((*code, false));
    }
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=24).contains(&n).then_some((KeyCode::F(n), false));
    }

    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if ch.is_ascii_uppercase() {
        Some((KeyCode::Char(ch.to_ascii_lowercase()), true))
    } else {
        Some((KeyCode::Char(ch), false))
    }
}

fn cache_root() -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);
    if cfg!(target_os = "windows") {
        std::env::var_os("LOCALAPPDATA")
            .or_else(|| std::env::var_os("APPDATA"))
            .map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home().map(|h| h.join("Library").join("Caches"))
    } else {
        std::env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .filter(|dir| dir.is_absolute())
            .or_else(|| home().map(|h| h.join(".cache")))
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
