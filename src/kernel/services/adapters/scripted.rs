//! 无界面的 `Dialogs` 实现
//!
//! 预先排好每个对话框的答案，并记录所有弹出过的提示。
//! 测试和无终端的调用方都用它。

use crate::kernel::services::ports::dialog::Dialogs;
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Confirm { title: String, message: String },
    Error { title: String, message: String },
    OpenPath,
    SavePath,
}

#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    confirms: VecDeque<bool>,
    open_paths: VecDeque<Option<PathBuf>>,
    save_paths: VecDeque<Option<PathBuf>>,
    prompts: Vec<Prompt>,
    title: Option<String>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_confirm(mut self, yes: bool) -> Self {
        self.confirms.push_back(yes);
        self
    }

    pub fn answer_open(mut self, path: Option<PathBuf>) -> Self {
        self.open_paths.push_back(path);
        self
    }

    pub fn answer_save(mut self, path: Option<PathBuf>) -> Self {
        self.save_paths.push_back(path);
        self
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn errors(&self) -> Vec<&str> {
        self.prompts
            .iter()
            .filter_map(|p| match p {
                Prompt::Error { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn confirm_count(&self) -> usize {
        self.prompts
            .iter()
            .filter(|p| matches!(p, Prompt::Confirm { .. }))
            .count()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl Dialogs for ScriptedDialogs {
    /// Unscripted questions are declined.
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.prompts.push(Prompt::Confirm {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.confirms.pop_front().unwrap_or(false)
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.prompts.push(Prompt::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn ask_open_path(&mut self) -> Option<PathBuf> {
        self.prompts.push(Prompt::OpenPath);
        self.open_paths.pop_front().flatten()
    }

    fn ask_save_path(&mut self) -> Option<PathBuf> {
        self.prompts.push(Prompt::SavePath);
        self.save_paths.pop_front().flatten()
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }
}
