//! 核心类型模块
//!
//! - Command: 语义命令（菜单和快捷键的公共出口）
//! - Key: 归一化后的按键

pub mod command;
pub mod event;

pub use command::Command;
pub use event::Key;
