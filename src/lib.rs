//! simedit - 单文件终端文本编辑器库
//!
//! 模块结构：
//! - core: 命令和按键
//! - kernel: 文档状态、文本缓冲区、编辑器控制器、菜单，以及服务层（ports + adapters）
//! - tui: 终端前端（crossterm + ratatui），可通过 `tui` feature 关闭

pub mod core;
pub mod kernel;

#[cfg(feature = "tui")]
pub mod tui;
