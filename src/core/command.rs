//! 命令系统：语义命令定义
//!
//! 菜单项和快捷键都只产生 `Command`，由 `EditorController::dispatch`
//! 统一分发，不关心具体按键。

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== 文件操作 ====================
    NewFile,
    OpenFile,
    Save,
    SaveAs,
    Exit,

    // ==================== 光标移动 ====================
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorLineStart,
    CursorLineEnd,
    CursorFileStart,
    CursorFileEnd,
    PageUp,
    PageDown,

    // ==================== 编辑操作 ====================
    InsertChar(char),
    InsertText(String),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,

    // ==================== 视图操作 ====================
    OpenMenu,
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::NewFile => "newFile",
            Command::OpenFile => "openFile",
            Command::Save => "save",
            Command::SaveAs => "saveAs",
            Command::Exit => "exit",
            Command::CursorLeft => "cursorLeft",
            Command::CursorRight => "cursorRight",
            Command::CursorUp => "cursorUp",
            Command::CursorDown => "cursorDown",
            Command::CursorLineStart => "cursorLineStart",
            Command::CursorLineEnd => "cursorLineEnd",
            Command::CursorFileStart => "cursorFileStart",
            Command::CursorFileEnd => "cursorFileEnd",
            Command::PageUp => "pageUp",
            Command::PageDown => "pageDown",
            Command::InsertChar(_) => "insertChar",
            Command::InsertText(_) => "insertText",
            Command::InsertNewline => "insertNewline",
            Command::InsertTab => "insertTab",
            Command::DeleteBackward => "deleteBackward",
            Command::DeleteForward => "deleteForward",
            Command::OpenMenu => "openMenu",
        }
    }

    /// Parses the name used in `settings.json` keybinding rules.
    ///
    /// Only argument-less commands can be bound, so `insertChar` and
    /// `insertText` are rejected.
    pub fn from_name(name: &str) -> Option<Command> {
        let cmd = match name.trim() {
            "newFile" => Command::NewFile,
            "openFile" => Command::OpenFile,
            "save" => Command::Save,
            "saveAs" => Command::SaveAs,
            "exit" | "quit" => Command::Exit,
            "cursorLeft" => Command::CursorLeft,
            "cursorRight" => Command::CursorRight,
            "cursorUp" => Command::CursorUp,
            "cursorDown" => Command::CursorDown,
            "cursorLineStart" => Command::CursorLineStart,
            "cursorLineEnd" => Command::CursorLineEnd,
            "cursorFileStart" => Command::CursorFileStart,
            "cursorFileEnd" => Command::CursorFileEnd,
            "pageUp" => Command::PageUp,
            "pageDown" => Command::PageDown,
            "insertNewline" => Command::InsertNewline,
            "insertTab" => Command::InsertTab,
            "deleteBackward" => Command::DeleteBackward,
            "deleteForward" => Command::DeleteForward,
            "openMenu" => Command::OpenMenu,
            _ => return None,
        };
        Some(cmd)
    }

    pub fn is_file_command(&self) -> bool {
        matches!(
            self,
            Command::NewFile | Command::OpenFile | Command::Save | Command::SaveAs | Command::Exit
        )
    }
}
