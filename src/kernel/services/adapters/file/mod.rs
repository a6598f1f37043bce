//! 文件服务模块
//!
//! 本地文件系统实现，编辑器通过 `FileProvider` 访问它。

pub mod local;

pub use local::LocalFileProvider;
