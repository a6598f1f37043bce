//! 文档状态
//!
//! 显示名以 `*` 结尾表示有未保存的修改；保存成功时去掉，编辑时补回。

use std::path::{Path, PathBuf};

pub const APP_TITLE: &str = "SimEdit";
pub const UNTITLED: &str = "untitled*";
pub const DIRTY_MARK: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    pub display_name: String,
    pub file_path: PathBuf,
    pub original_text: String,
}

impl DocumentState {
    /// The placeholder document. Its path is `<dir>/untitled`.
    pub fn untitled(dir: &Path) -> Self {
        Self {
            display_name: UNTITLED.to_string(),
            file_path: dir.join(UNTITLED.trim_end_matches(DIRTY_MARK)),
            original_text: String::new(),
        }
    }

    /// State right after a successful load. The name keeps the `*`
    /// marker until the first save.
    pub fn opened(path: &Path, content: String) -> Self {
        Self {
            display_name: format!("{}{}", path.display(), DIRTY_MARK),
            file_path: path.to_path_buf(),
            original_text: content,
        }
    }

    pub fn has_dirty_mark(&self) -> bool {
        self.display_name.ends_with(DIRTY_MARK)
    }

    /// Returns true if the name changed.
    pub fn mark_dirty(&mut self) -> bool {
        if self.has_dirty_mark() {
            return false;
        }
        self.display_name.push(DIRTY_MARK);
        true
    }

    pub fn strip_dirty_mark(&mut self) {
        if self.has_dirty_mark() {
            self.display_name.pop();
        }
    }

    /// Applied after a successful Save As.
    pub fn rename_to(&mut self, path: &Path, written: String) {
        self.display_name = base_name(path);
        self.file_path = path.to_path_buf();
        self.original_text = written;
    }

    pub fn title(&self) -> String {
        format!("{} - {}", self.display_name, APP_TITLE)
    }
}

pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/document.rs"]
mod tests;
