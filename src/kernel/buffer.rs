//! 文本缓冲区模型
//!
//! 职责：
//! - 文本存储（Rope）
//! - 光标管理（行 + 行内字符列）
//! - "自上次加载以来是否修改" 标志

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;

/// 从 RopeSlice 获取字符串，优先零拷贝
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Length of a rope line in chars, without its terminator.
fn content_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    let last = line.char(len - 1);
    if last == '\n' && len >= 2 && line.char(len - 2) == '\r' {
        len - 2
    } else if is_line_break(last) {
        len - 1
    } else {
        len
    }
}

#[derive(Clone, Debug)]
pub struct TextBuffer {
    rope: Rope,
    cursor: (usize, usize),
    preferred_col: Option<usize>,
    modified: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor: (0, 0),
            preferred_col: None,
            modified: false,
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Line content without its terminator.
    pub fn line(&self, row: usize) -> Option<Cow<'_, str>> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(row);
        Some(slice_to_cow(line.slice(..content_len(line))))
    }

    pub fn line_len(&self, row: usize) -> usize {
        if row >= self.rope.len_lines() {
            return 0;
        }
        content_len(self.rope.line(row))
    }

    /// Empties the buffer and clears the modified flag.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.cursor = (0, 0);
        self.preferred_col = None;
        self.modified = false;
    }

    /// Replaces the whole content. Counts as an edit.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = (0, 0);
        self.preferred_col = None;
        self.modified = true;
    }

    fn cursor_char(&self) -> usize {
        self.rope.line_to_char(self.cursor.0) + self.cursor.1
    }

    fn set_cursor_char(&mut self, char_idx: usize) {
        let char_idx = char_idx.min(self.rope.len_chars());
        let row = self.rope.char_to_line(char_idx);
        let col = char_idx - self.rope.line_to_char(row);
        self.cursor = (row, col.min(self.line_len(row)));
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.rope.len_lines().saturating_sub(1));
        self.cursor = (row, col.min(self.line_len(row)));
        self.preferred_col = None;
    }

    // ==================== 编辑 ====================

    pub fn insert_char(&mut self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' {
            return self.insert_newline();
        }
        let idx = self.cursor_char();
        self.rope.insert_char(idx, ch);
        if is_line_break(ch) {
            self.set_cursor_char(idx + 1);
        } else {
            self.cursor.1 += 1;
        }
        self.preferred_col = None;
        self.modified = true;
        true
    }

    /// Pasted text; CRLF and lone CR become LF.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let idx = self.cursor_char();
        self.rope.insert(idx, &normalized);
        self.set_cursor_char(idx + normalized.chars().count());
        self.preferred_col = None;
        self.modified = true;
        true
    }

    pub fn insert_newline(&mut self) -> bool {
        let idx = self.cursor_char();
        self.rope.insert_char(idx, '\n');
        self.cursor = (self.cursor.0 + 1, 0);
        self.preferred_col = None;
        self.modified = true;
        true
    }

    /// Inserts spaces up to the next tab stop.
    pub fn insert_tab(&mut self, tab_size: u8) -> bool {
        let tab_size = usize::from(tab_size.max(1));
        let n = tab_size - (self.cursor.1 % tab_size);
        let idx = self.cursor_char();
        self.rope.insert(idx, &" ".repeat(n));
        self.cursor.1 += n;
        self.preferred_col = None;
        self.modified = true;
        true
    }

    pub fn delete_backward(&mut self) -> bool {
        let idx = self.cursor_char();
        if idx == 0 {
            return false;
        }
        let mut start = idx - 1;
        if self.rope.char(start) == '\n' && start > 0 && self.rope.char(start - 1) == '\r' {
            start -= 1;
        }
        self.rope.remove(start..idx);
        self.set_cursor_char(start);
        self.preferred_col = None;
        self.modified = true;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char();
        let len = self.rope.len_chars();
        if idx >= len {
            return false;
        }
        let mut end = idx + 1;
        if self.rope.char(idx) == '\r' && end < len && self.rope.char(end) == '\n' {
            end += 1;
        }
        self.rope.remove(idx..end);
        self.set_cursor_char(idx);
        self.preferred_col = None;
        self.modified = true;
        true
    }

    // ==================== 光标移动 ====================

    pub fn move_left(&mut self) -> bool {
        self.preferred_col = None;
        let (row, col) = self.cursor;
        if col > 0 {
            self.cursor.1 -= 1;
            true
        } else if row > 0 {
            self.cursor = (row - 1, self.line_len(row - 1));
            true
        } else {
            false
        }
    }

    pub fn move_right(&mut self) -> bool {
        self.preferred_col = None;
        let (row, col) = self.cursor;
        if col < self.line_len(row) {
            self.cursor.1 += 1;
            true
        } else if row + 1 < self.rope.len_lines() {
            self.cursor = (row + 1, 0);
            true
        } else {
            false
        }
    }

    pub fn move_up(&mut self) -> bool {
        self.move_rows_up(1)
    }

    pub fn move_down(&mut self) -> bool {
        self.move_rows_down(1)
    }

    pub fn move_rows_up(&mut self, rows: usize) -> bool {
        let (row, col) = self.cursor;
        if row == 0 {
            return false;
        }
        let want = *self.preferred_col.get_or_insert(col);
        let target = row.saturating_sub(rows.max(1));
        self.cursor = (target, want.min(self.line_len(target)));
        true
    }

    pub fn move_rows_down(&mut self, rows: usize) -> bool {
        let (row, col) = self.cursor;
        let last = self.rope.len_lines().saturating_sub(1);
        if row >= last {
            return false;
        }
        let want = *self.preferred_col.get_or_insert(col);
        let target = (row + rows.max(1)).min(last);
        self.cursor = (target, want.min(self.line_len(target)));
        true
    }

    pub fn move_line_start(&mut self) -> bool {
        self.preferred_col = None;
        let changed = self.cursor.1 != 0;
        self.cursor.1 = 0;
        changed
    }

    pub fn move_line_end(&mut self) -> bool {
        self.preferred_col = None;
        let end = self.line_len(self.cursor.0);
        let changed = self.cursor.1 != end;
        self.cursor.1 = end;
        changed
    }

    pub fn move_file_start(&mut self) -> bool {
        self.preferred_col = None;
        let changed = self.cursor != (0, 0);
        self.cursor = (0, 0);
        changed
    }

    pub fn move_file_end(&mut self) -> bool {
        self.preferred_col = None;
        let before = self.cursor;
        self.set_cursor_char(self.rope.len_chars());
        before != self.cursor
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/buffer.rs"]
mod tests;
