//! 快捷键表
//!
//! 两层：`Global` 在任何地方生效，`Editor` 只在文本区生效并优先于 `Global`。
//! 用户在 settings 中写的规则一律进入 `Global`，并顶掉 `Editor` 中的同键绑定。

use crate::core::event::{Key, KeyCode};
use crate::core::Command;
use crate::kernel::services::ports::settings::KeybindingRule;
use rustc_hash::FxHashMap;

use super::settings::parse_keybinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindingContext {
    Global,
    Editor,
}

type KeyMap = FxHashMap<Key, Command>;

#[derive(Debug, Clone)]
pub struct KeybindingService {
    global: KeyMap,
    editor: KeyMap,
}

impl KeybindingService {
    pub fn with_defaults() -> Self {
        Self {
            global: global_defaults().into_iter().collect(),
            editor: editor_defaults().into_iter().collect(),
        }
    }

    pub fn resolve(&self, context: KeybindingContext, key: &Key) -> Option<&Command> {
        let global = self.global.get(key);
        match context {
            KeybindingContext::Global => global,
            KeybindingContext::Editor => self.editor.get(key).or(global),
        }
    }

    /// Returns how many rules took effect. Bad rules are logged and skipped.
    pub fn apply_rules(&mut self, rules: &[KeybindingRule]) -> usize {
        rules
            .iter()
            .filter_map(|rule| {
                let key = parse_keybinding(&rule.key);
                let command = Command::from_name(&rule.command);
                match (key, command) {
                    (Some(key), Some(command)) => Some((key, command)),
                    (None, _) => {
                        tracing::warn!(key = %rule.key, "skipping rule: unparsable key");
                        None
                    }
                    (_, None) => {
                        tracing::warn!(command = %rule.command, "skipping rule: unknown command");
                        None
                    }
                }
            })
            .map(|(key, command)| {
                self.editor.remove(&key);
                self.global.insert(key, command);
            })
            .count()
    }

    /// Shortest label wins so the hint is stable when several keys share a
    /// command.
    pub fn shortcut_for(&self, command: &Command) -> Option<Key> {
        self.global
            .iter()
            .filter_map(|(key, bound)| (bound == command).then_some(*key))
            .min_by_key(|key| {
                let label = key.label();
                (label.len(), label)
            })
    }
}

impl Default for KeybindingService {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn global_defaults() -> [(Key, Command); 7] {
    let ctrl = |ch| Key::ctrl(KeyCode::Char(ch));
    [
        (ctrl('n'), Command::NewFile),
        (ctrl('o'), Command::OpenFile),
        (ctrl('s'), Command::Save),
        (Key::ctrl_shift(KeyCode::Char('s')), Command::SaveAs),
        (ctrl('q'), Command::Exit),
        (Key::simple(KeyCode::F(10)), Command::OpenMenu),
        (Key::alt(KeyCode::Char('f')), Command::OpenMenu),
    ]
}

fn editor_defaults() -> [(Key, Command); 14] {
    use KeyCode::*;
    [
        (Key::simple(Left), Command::CursorLeft),
        (Key::simple(Right), Command::CursorRight),
        (Key::simple(Up), Command::CursorUp),
        (Key::simple(Down), Command::CursorDown),
        (Key::simple(Home), Command::CursorLineStart),
        (Key::simple(End), Command::CursorLineEnd),
        (Key::ctrl(Home), Command::CursorFileStart),
        (Key::ctrl(End), Command::CursorFileEnd),
        (Key::simple(PageUp), Command::PageUp),
        (Key::simple(PageDown), Command::PageDown),
        (Key::simple(Enter), Command::InsertNewline),
        (Key::simple(Tab), Command::InsertTab),
        (Key::simple(Backspace), Command::DeleteBackward),
        (Key::simple(Delete), Command::DeleteForward),
    ]
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/keybinding.rs"]
mod tests;
