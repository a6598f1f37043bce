//! simedit - 单文件终端文本编辑器
//!
//! 用法：`simedit [PATH]`

mod logging;

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use simedit::kernel::services::adapters::{
    ensure_backup_dir, ensure_settings_file, load_settings, KeybindingService,
};
use simedit::kernel::{EditorController, EditorOptions};
use simedit::tui::app::{self, App};
use simedit::tui::events::CrosstermEvents;
use simedit::tui::terminal_guard::TerminalGuard;
use std::io;
use std::path::PathBuf;

fn main() -> io::Result<()> {
    let _logging = logging::init();

    if let Err(err) = ensure_settings_file() {
        tracing::warn!(error = %err, "cannot create settings file");
    }
    let settings = load_settings();

    let work_dir = std::env::current_dir()?;
    let backup_dir = if settings.backup_on_discard {
        ensure_backup_dir()
            .map_err(|err| tracing::warn!(error = %err, "backup dir unavailable"))
            .ok()
    } else {
        None
    };
    let options = EditorOptions::from_settings(&settings, backup_dir);
    let editor = EditorController::new(work_dir.clone(), options);

    let mut keybindings = KeybindingService::with_defaults();
    keybindings.apply_rules(&settings.keybindings);

    let mut app = App::new(editor, keybindings, &settings.editor);
    if let Some(arg) = std::env::args_os().nth(1) {
        let path = PathBuf::from(arg);
        app.open_on_start(if path.is_absolute() {
            path
        } else {
            work_dir.join(path)
        });
    }

    let guard = TerminalGuard::new()?;
    let signals = install_signals(&guard);
    let mut events = CrosstermEvents::new(signals);
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let result = app::run(&mut terminal, &mut events, &mut app, true);
    drop(terminal);
    drop(guard);

    if let Some(signal) = events.terminated() {
        tracing::info!(?signal, "exiting on signal");
        std::process::exit(signal.exit_code());
    }
    if let Err(err) = &result {
        tracing::error!(error = %err, "main loop failed");
    }
    result
}

#[cfg(unix)]
fn install_signals(
    guard: &TerminalGuard,
) -> Option<std::sync::mpsc::Receiver<simedit::tui::terminal_guard::TerminationSignal>> {
    let (tx, rx) = std::sync::mpsc::channel();
    match simedit::tui::terminal_guard::install_termination_signals(guard.restorer(), tx) {
        Ok(_) => Some(rx),
        Err(err) => {
            tracing::warn!(error = %err, "signal handlers not installed");
            None
        }
    }
}

#[cfg(not(unix))]
fn install_signals(
    _guard: &TerminalGuard,
) -> Option<std::sync::mpsc::Receiver<simedit::tui::terminal_guard::TerminationSignal>> {
    None
}
