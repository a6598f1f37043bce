//! 日志只写文件：终端被 TUI 占用。
//!
//! 文件按天滚动，位于 `<data_dir>/simedit/logs/`，取不到数据目录时退到
//! 系统临时目录。过滤规则读 `RUST_LOG`，缺省 `simedit=info`。

use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "simedit.log";
const DEFAULT_FILTER: &str = "simedit=info";

/// Dropping this flushes whatever the background writer still holds.
pub struct LoggingGuard {
    _writer: WorkerGuard,
}

fn resolve_log_dir() -> io::Result<PathBuf> {
    simedit::kernel::services::adapters::ensure_log_dir().or_else(|err| {
        let fallback = std::env::temp_dir().join("simedit").join("logs");
        std::fs::create_dir_all(&fallback)?;
        eprintln!("simedit: logging to {} ({err})", fallback.display());
        Ok(fallback)
    })
}

pub fn init() -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir().ok()?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "panicked");
        previous(info);
    }));

    tracing::info!(dir = %log_dir.display(), version = env!("CARGO_PKG_VERSION"), "logging started");
    Some(LoggingGuard { _writer: guard })
}
