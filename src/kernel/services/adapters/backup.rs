//! 应用数据目录与丢弃前备份
//!
//! 目录布局 `<data_dir>/simedit/{backups,logs}`：
//! - macOS: ~/Library/Application Support
//! - Linux: $XDG_DATA_HOME 或 ~/.local/share
//! - Windows: %APPDATA%
//!
//! 被丢弃的缓冲区写到 `backups/<路径哈希>-<文件名>.bak`，
//! 同一文件的多次丢弃互相覆盖。

use crate::kernel::services::ports::file::{FileProvider, Result as FileResult};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "simedit";
const BACKUP_DIR: &str = "backups";
const LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// `None` when the platform data directory cannot be determined.
    pub fn locate() -> Option<Self> {
        data_root().map(|dir| Self::from_root(dir.join(APP_NAME)))
    }

    pub fn from_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn backups(&self) -> PathBuf {
        self.root.join(BACKUP_DIR)
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join(LOG_DIR)
    }
}

fn data_root() -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);
    if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home().map(|h| h.join("Library").join("Application Support"))
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .filter(|dir| dir.is_absolute())
            .or_else(|| home().map(|h| h.join(".local").join("share")))
    }
}

fn ensure_dir(dir: Option<PathBuf>, what: &str) -> io::Result<PathBuf> {
    let dir = dir.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("cannot determine {what} directory"),
        )
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn ensure_backup_dir() -> io::Result<PathBuf> {
    ensure_dir(AppDirs::locate().map(|dirs| dirs.backups()), "backup")
}

pub fn ensure_log_dir() -> io::Result<PathBuf> {
    ensure_dir(AppDirs::locate().map(|dirs| dirs.logs()), "log")
}

fn path_digest(path: &Path) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

pub fn backup_file_path(backup_dir: &Path, doc_path: &Path) -> PathBuf {
    let name = doc_path
        .file_name()
        .map_or_else(|| "untitled".into(), |n| n.to_string_lossy());
    backup_dir.join(format!("{:016x}-{name}.bak", path_digest(doc_path)))
}

/// Writes `content` next to the other backups, creating the directory if
/// needed. Returns the backup's path.
pub fn write_backup(
    files: &dyn FileProvider,
    backup_dir: &Path,
    doc_path: &Path,
    content: &str,
) -> FileResult<PathBuf> {
    std::fs::create_dir_all(backup_dir)?;
    let target = backup_file_path(backup_dir, doc_path);
    files.write_file(&target, content)?;
    Ok(target)
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/backup.rs"]
mod tests;
