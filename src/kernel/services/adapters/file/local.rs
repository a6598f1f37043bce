//! `std::fs` backed `FileProvider`: whole-file UTF-8 reads and writes,
//! no temp-file-and-rename.

use crate::kernel::services::ports::file::{FileError, FileProvider, Result};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileProvider;

impl LocalFileProvider {
    pub fn new() -> Self {
        Self
    }
}

fn classify(path: &Path, err: io::Error) -> FileError {
    match err.kind() {
        io::ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
        _ => FileError::Io(err),
    }
}

impl FileProvider for LocalFileProvider {
    fn read_file(&self, path: &Path) -> Result<String> {
        let meta = fs::metadata(path).map_err(|err| classify(path, err))?;
        if !meta.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        tracing::trace!(path = %path.display(), bytes = text.len(), "read");
        Ok(text)
    }

    /// Missing parent directories are an error.
    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if fs::metadata(path).is_ok_and(|meta| meta.is_dir()) {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        fs::write(path, content)?;
        tracing::trace!(path = %path.display(), bytes = content.len(), "written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
