//! 编辑器控制器
//!
//! 持有文档状态和文本缓冲区，实现 New / Open / Save / Save As，
//! 以及"是否已修改"和"外部冲突"两个检查。所有文件 IO 同步进行，
//! 所有提示通过 `Dialogs` 模态弹出。

use super::buffer::TextBuffer;
use super::document::DocumentState;
use super::services::adapters::backup::write_backup;
use super::services::adapters::file::LocalFileProvider;
use super::services::ports::dialog::Dialogs;
use super::services::ports::file::{FileError, FileProvider};
use super::services::ports::settings::Settings;
use crate::core::Command;
use std::path::{Path, PathBuf};

pub const DISCARD_PROMPT: &str = "File has been modified.\nDiscard changes and continue?";
pub const OPEN_FAILED: &str = "Error while opening the file!!!";
pub const EXTERNAL_CONFLICT: &str =
    "The file has been modified by another application.\nPlease Save As with another name!!";

const CONFIRM_TITLE: &str = "WARNING";
const ERROR_TITLE: &str = "ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub enum EditorError {
    FileRead { path: PathBuf, source: FileError },
    FileWrite { path: PathBuf, source: FileError },
    ExternalConflict { path: PathBuf },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::FileRead { path, source } => {
                write!(f, "Cannot open {}: {}", path.display(), source)
            }
            EditorError::FileWrite { path, source } => {
                write!(f, "Cannot save {}: {}", path.display(), source)
            }
            EditorError::ExternalConflict { path } => {
                write!(f, "{} was changed on disk, use Save As", path.display())
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::FileRead { source, .. } | EditorError::FileWrite { source, .. } => {
                Some(source)
            }
            EditorError::ExternalConflict { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub tab_size: u8,
    pub confirm_exit: bool,
    /// `None` disables backups of discarded buffers.
    pub backup_dir: Option<PathBuf>,
}

impl EditorOptions {
    pub fn from_settings(settings: &Settings, backup_dir: Option<PathBuf>) -> Self {
        Self {
            tab_size: settings.editor.tab_size,
            confirm_exit: settings.confirm_exit,
            backup_dir: backup_dir.filter(|_| settings.backup_on_discard),
        }
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            confirm_exit: false,
            backup_dir: None,
        }
    }
}

pub struct EditorController {
    doc: DocumentState,
    buffer: TextBuffer,
    files: Box<dyn FileProvider>,
    work_dir: PathBuf,
    options: EditorOptions,
    page_rows: usize,
}

impl EditorController {
    pub fn new(work_dir: PathBuf, options: EditorOptions) -> Self {
        Self::with_provider(work_dir, options, Box::new(LocalFileProvider::new()))
    }

    pub fn with_provider(
        work_dir: PathBuf,
        options: EditorOptions,
        files: Box<dyn FileProvider>,
    ) -> Self {
        Self {
            doc: DocumentState::untitled(&work_dir),
            buffer: TextBuffer::new(),
            files,
            work_dir,
            options,
            page_rows: 20,
        }
    }

    pub fn document(&self) -> &DocumentState {
        &self.doc
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn title(&self) -> String {
        self.doc.title()
    }

    pub fn set_page_rows(&mut self, rows: usize) {
        self.page_rows = rows.max(1);
    }

    /// True only while the name carries `*` and the buffer reports edits.
    pub fn is_file_modified(&self) -> bool {
        self.doc.has_dirty_mark() && self.buffer.is_modified()
    }

    pub fn dispatch(
        &mut self,
        command: Command,
        dialogs: &mut dyn Dialogs,
    ) -> Result<Flow, EditorError> {
        tracing::debug!(command = command.name(), "dispatch");
        match command {
            Command::NewFile => {
                self.new_file(dialogs);
            }
            Command::OpenFile => {
                self.open_file(dialogs)?;
            }
            Command::Save => self.save(dialogs)?,
            Command::SaveAs => {
                self.save_as(dialogs)?;
            }
            Command::Exit => return Ok(self.exit(dialogs)),
            Command::OpenMenu => {}
            other => {
                self.edit(&other, dialogs);
            }
        }
        Ok(Flow::Continue)
    }

    /// Returns false when the user kept the modified buffer.
    pub fn new_file(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if !self.discard_gate(dialogs) {
            return false;
        }
        self.reset_untitled();
        dialogs.set_title(&self.title());
        tracing::info!("new untitled document");
        true
    }

    /// `Ok(false)` when the discard prompt was declined or the dialog cancelled.
    /// The buffer is emptied before the dialog shows, so a cancelled open
    /// leaves an empty buffer under the old document state.
    pub fn open_file(&mut self, dialogs: &mut dyn Dialogs) -> Result<bool, EditorError> {
        if !self.discard_gate(dialogs) {
            return Ok(false);
        }
        self.buffer.clear();
        let Some(path) = dialogs.ask_open_path() else {
            tracing::debug!("open cancelled");
            return Ok(false);
        };
        self.open_path(&path, dialogs)?;
        Ok(true)
    }

    /// Loads `path` into a fresh buffer. On failure the error is shown and
    /// the document falls back to the untitled placeholder.
    pub fn open_path(&mut self, path: &Path, dialogs: &mut dyn Dialogs) -> Result<(), EditorError> {
        self.buffer.clear();
        match self.files.read_file(path) {
            Ok(content) => {
                self.buffer.set_text(&content);
                self.buffer.set_modified(false);
                self.doc = DocumentState::opened(path, content);
                dialogs.set_title(&self.title());
                tracing::info!(path = %path.display(), "file opened");
                Ok(())
            }
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "open failed");
                dialogs.show_error(ERROR_TITLE, OPEN_FAILED);
                self.reset_untitled();
                dialogs.set_title(&self.title());
                Err(EditorError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Optimistic conflict check against the content last loaded or saved.
    /// A missing or unreadable file is safe to write.
    pub fn can_save(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        match self.files.read_file(&self.doc.file_path) {
            Err(_) => true,
            Ok(on_disk) if on_disk == self.doc.original_text => true,
            Ok(_) => {
                tracing::warn!(path = %self.doc.file_path.display(), "file changed on disk");
                dialogs.show_error(ERROR_TITLE, EXTERNAL_CONFLICT);
                false
            }
        }
    }

    pub fn save(&mut self, dialogs: &mut dyn Dialogs) -> Result<(), EditorError> {
        let path = self.doc.file_path.clone();
        if !self.can_save(dialogs) {
            tracing::warn!(path = %path.display(), "save aborted");
            return Err(EditorError::ExternalConflict { path });
        }

        let text = self.buffer.text();
        if let Err(source) = self.files.write_file(&path, &text) {
            tracing::error!(path = %path.display(), error = %source, "save failed");
            return Err(EditorError::FileWrite { path, source });
        }

        self.doc.strip_dirty_mark();
        self.doc.original_text = text;
        self.buffer.set_modified(false);
        dialogs.set_title(&self.title());
        tracing::info!(path = %path.display(), "file saved");
        Ok(())
    }

    /// Always asks for a location. `Ok(false)` when the dialog was cancelled.
    pub fn save_as(&mut self, dialogs: &mut dyn Dialogs) -> Result<bool, EditorError> {
        let text = self.buffer.text();
        let Some(path) = dialogs.ask_save_path() else {
            tracing::debug!("save as cancelled");
            return Ok(false);
        };

        if let Err(source) = self.files.write_file(&path, &text) {
            tracing::error!(path = %path.display(), error = %source, "save as failed");
            return Err(EditorError::FileWrite { path, source });
        }

        self.doc.rename_to(&path, text);
        self.buffer.set_modified(false);
        dialogs.set_title(&self.title());
        tracing::info!(path = %path.display(), "file saved as");
        Ok(true)
    }

    /// Applies an editing or cursor command. Returns true if anything changed.
    pub fn edit(&mut self, command: &Command, dialogs: &mut dyn Dialogs) -> bool {
        let buffer = &mut self.buffer;
        let text_changed = match command {
            Command::InsertChar(ch) => buffer.insert_char(*ch),
            Command::InsertText(text) => buffer.insert_str(text),
            Command::InsertNewline => buffer.insert_newline(),
            Command::InsertTab => buffer.insert_tab(self.options.tab_size),
            Command::DeleteBackward => buffer.delete_backward(),
            Command::DeleteForward => buffer.delete_forward(),
            Command::CursorLeft => return buffer.move_left(),
            Command::CursorRight => return buffer.move_right(),
            Command::CursorUp => return buffer.move_up(),
            Command::CursorDown => return buffer.move_down(),
            Command::CursorLineStart => return buffer.move_line_start(),
            Command::CursorLineEnd => return buffer.move_line_end(),
            Command::CursorFileStart => return buffer.move_file_start(),
            Command::CursorFileEnd => return buffer.move_file_end(),
            Command::PageUp => return buffer.move_rows_up(self.page_rows),
            Command::PageDown => return buffer.move_rows_down(self.page_rows),
            _ => return false,
        };

        if text_changed && self.doc.mark_dirty() {
            dialogs.set_title(&self.title());
        }
        text_changed
    }

    fn exit(&mut self, dialogs: &mut dyn Dialogs) -> Flow {
        if self.options.confirm_exit && !self.discard_gate(dialogs) {
            return Flow::Continue;
        }
        tracing::info!("exit");
        Flow::Exit
    }

    /// Asks before throwing away a modified buffer.
    fn discard_gate(&mut self, dialogs: &mut dyn Dialogs) -> bool {
        if !self.is_file_modified() {
            return true;
        }
        if !dialogs.confirm(CONFIRM_TITLE, DISCARD_PROMPT) {
            tracing::debug!("discard declined");
            return false;
        }
        self.backup_before_discard();
        true
    }

    fn backup_before_discard(&self) {
        let Some(dir) = &self.options.backup_dir else {
            return;
        };
        match write_backup(
            self.files.as_ref(),
            dir,
            &self.doc.file_path,
            &self.buffer.text(),
        ) {
            Ok(path) => tracing::info!(backup = %path.display(), "discarded buffer backed up"),
            Err(err) => tracing::warn!(error = %err, "backup before discard failed"),
        }
    }

    fn reset_untitled(&mut self) {
        self.buffer.clear();
        self.doc = DocumentState::untitled(&self.work_dir);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/controller.rs"]
mod tests;
