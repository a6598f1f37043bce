//! 终端模式守卫
//!
//! 进入：raw mode、备用屏幕、鼠标捕获、括号粘贴、竖线光标。
//! 退出：按相反顺序逐项恢复，任何一步失败都不影响后面的步骤。
//! 恢复只会执行一次，无论来自 Drop、信号线程还是显式调用。

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Time the main loop gets to notice a termination signal before the
/// watcher thread restores the terminal and exits on its own.
pub const SIGNAL_GRACE: Duration = Duration::from_secs(2);

pub trait TerminalOps: Send + Sync + 'static {
    fn setup(&self) -> io::Result<()>;
    fn restore(&self) -> io::Result<()>;
}

/// The real terminal, driven through crossterm on stdout.
#[derive(Debug, Default)]
pub struct CrosstermTerminalOps;

impl TerminalOps for CrosstermTerminalOps {
    fn setup(&self) -> io::Result<()> {
        use crossterm::cursor::SetCursorStyle;
        use crossterm::event::{EnableBracketedPaste, EnableMouseCapture};
        use crossterm::terminal::{enable_raw_mode, EnterAlternateScreen};

        enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            SetCursorStyle::BlinkingBar
        )
    }

    fn restore(&self) -> io::Result<()> {
        use crossterm::cursor::{SetCursorStyle, Show};
        use crossterm::event::{DisableBracketedPaste, DisableMouseCapture};
        use crossterm::terminal::{disable_raw_mode, LeaveAlternateScreen};

        let screen = crossterm::execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            SetCursorStyle::DefaultUserShape,
            Show
        );
        let raw = disable_raw_mode();
        screen.and(raw)
    }
}

/// Cloneable handle that restores the terminal at most once.
#[derive(Clone)]
pub struct TerminalRestorer {
    done: Arc<AtomicBool>,
    ops: Arc<dyn TerminalOps>,
}

impl TerminalRestorer {
    pub fn restore(&self) -> io::Result<()> {
        if self.done.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.ops.restore()
    }
}

/// Puts the terminal into editor mode on creation and restores it on drop.
pub struct TerminalGuard {
    restorer: TerminalRestorer,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        Self::with_ops(Arc::new(CrosstermTerminalOps))
    }

    /// Nothing is restored if `setup` fails.
    pub fn with_ops(ops: Arc<dyn TerminalOps>) -> io::Result<Self> {
        ops.setup()?;
        let restorer = TerminalRestorer {
            done: Arc::new(AtomicBool::new(false)),
            ops,
        };
        Ok(Self { restorer })
    }

    pub fn restorer(&self) -> TerminalRestorer {
        self.restorer.clone()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restorer.restore() {
            tracing::warn!(error = %err, "terminal restore failed");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    SigInt,
    SigTerm,
}

impl TerminationSignal {
    /// Shell convention: 128 + signal number.
    pub fn exit_code(self) -> i32 {
        match self {
            TerminationSignal::SigInt => 128 + 2,
            TerminationSignal::SigTerm => 128 + 15,
        }
    }

    #[cfg(unix)]
    fn from_raw(sig: i32) -> Option<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};
        match sig {
            SIGINT => Some(TerminationSignal::SigInt),
            SIGTERM => Some(TerminationSignal::SigTerm),
            _ => None,
        }
    }
}

/// Forwards SIGINT/SIGTERM to `tx`. `CrosstermEvents` picks the signal up
/// and ends the main loop; after `SIGNAL_GRACE` the watcher restores the
/// terminal and exits the process itself.
#[cfg(unix)]
pub fn install_termination_signals(
    restorer: TerminalRestorer,
    tx: std::sync::mpsc::Sender<TerminationSignal>,
) -> io::Result<std::thread::JoinHandle<()>> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::Builder::new()
        .name("simedit-signals".into())
        .spawn(move || {
            let Some(signal) = signals.forever().find_map(TerminationSignal::from_raw) else {
                return;
            };
            let _ = tx.send(signal);
            std::thread::sleep(SIGNAL_GRACE);
            let _ = restorer.restore();
            std::process::exit(signal.exit_code());
        })
}

#[cfg(test)]
#[path = "../../tests/unit/tui/terminal_guard.rs"]
mod tests;
