//! 菜单控制器
//!
//! 只有一个顶层菜单 "File"，条目顺序固定。菜单自身没有状态，
//! 激活条目就是把对应的 `Command` 交给编辑器控制器。

use super::controller::{EditorController, EditorError, Flow};
use super::services::ports::dialog::Dialogs;
use crate::core::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action { label: &'static str, command: Command },
    Separator,
}

impl MenuItem {
    pub fn label(&self) -> Option<&'static str> {
        match self {
            MenuItem::Action { label, .. } => Some(*label),
            MenuItem::Separator => None,
        }
    }

    pub fn command(&self) -> Option<&Command> {
        match self {
            MenuItem::Action { command, .. } => Some(command),
            MenuItem::Separator => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }
}

#[derive(Debug, Clone)]
pub struct Menu {
    pub label: &'static str,
    pub items: Vec<MenuItem>,
}

pub struct MenuController {
    file: Menu,
}

impl MenuController {
    pub fn new() -> Self {
        let file = Menu {
            label: "File",
            items: vec![
                MenuItem::Action {
                    label: "New File",
                    command: Command::NewFile,
                },
                MenuItem::Action {
                    label: "Open File",
                    command: Command::OpenFile,
                },
                MenuItem::Action {
                    label: "Save",
                    command: Command::Save,
                },
                MenuItem::Action {
                    label: "Save As",
                    command: Command::SaveAs,
                },
                MenuItem::Separator,
                MenuItem::Action {
                    label: "Exit",
                    command: Command::Exit,
                },
            ],
        };
        Self { file }
    }

    pub fn file_menu(&self) -> &Menu {
        &self.file
    }

    pub fn command_at(&self, index: usize) -> Option<Command> {
        self.file_menu()
            .items
            .get(index)
            .and_then(MenuItem::command)
            .cloned()
    }

    /// First selectable index.
    pub fn first_selectable(&self) -> usize {
        self.file_menu()
            .items
            .iter()
            .position(|item| !item.is_separator())
            .unwrap_or(0)
    }

    /// Steps `delta` selectable items from `index`, wrapping around and
    /// skipping separators.
    pub fn next_selectable(&self, index: usize, delta: isize) -> usize {
        let items = &self.file_menu().items;
        let len = items.len() as isize;
        if len == 0 {
            return 0;
        }
        let step = if delta < 0 { -1 } else { 1 };
        let mut remaining = delta.unsigned_abs();
        let mut idx = (index as isize).clamp(0, len - 1);
        while remaining > 0 {
            for _ in 0..len {
                idx = (idx + step).rem_euclid(len);
                if !items[idx as usize].is_separator() {
                    break;
                }
            }
            remaining -= 1;
        }
        idx as usize
    }

    /// Dispatches the item at `index`. Separators and out-of-range indices
    /// do nothing.
    pub fn activate(
        &self,
        index: usize,
        editor: &mut EditorController,
        dialogs: &mut dyn Dialogs,
    ) -> Option<Result<Flow, EditorError>> {
        let command = self.command_at(index)?;
        tracing::debug!(item = index, command = command.name(), "menu item activated");
        Some(editor.dispatch(command, dialogs))
    }
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/menu.rs"]
mod tests;
