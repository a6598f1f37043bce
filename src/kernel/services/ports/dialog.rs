//! 模态交互契约
//!
//! 所有方法都是阻塞的：调用返回时对话框已经关闭。

use std::path::PathBuf;

pub trait Dialogs {
    /// Yes/no question. `true` means the user accepted.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    fn show_error(&mut self, title: &str, message: &str);

    /// `None` when the user cancelled or entered nothing.
    fn ask_open_path(&mut self) -> Option<PathBuf>;

    /// `None` when the user cancelled or entered nothing.
    fn ask_save_path(&mut self) -> Option<PathBuf>;

    fn set_title(&mut self, title: &str);
}
