//! 终端应用：事件 → 命令 → 控制器，外加菜单和视口状态

use super::dialogs::TuiDialogs;
use super::events::EventSource;
use super::render;
use crate::core::event::{Key, KeyCode, KeyModifiers};
use crate::core::Command;
use crate::kernel::services::adapters::keybinding::{KeybindingContext, KeybindingService};
use crate::kernel::services::ports::dialog::Dialogs;
use crate::kernel::services::ports::settings::EditorSettings;
use crate::kernel::{EditorController, EditorError, Flow, MenuController};
use crossterm::event::{
    Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub open: bool,
    pub selected: usize,
}

/// First visible row / display column and the size of the text area as of
/// the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

pub struct App {
    pub(super) editor: EditorController,
    pub(super) menu: MenuController,
    pub(super) keybindings: KeybindingService,
    pub(super) menu_state: MenuState,
    pub(super) viewport: Viewport,
    pub(super) status: Option<String>,
    pub(super) tab_size: u8,
    pub(super) scroll_lines: usize,
    pub(super) show_line_numbers: bool,
    pub(super) last_menu_area: Option<Rect>,
    pub(super) last_menu_title_area: Option<Rect>,
    pending_open: Option<PathBuf>,
}

impl App {
    pub fn new(
        editor: EditorController,
        keybindings: KeybindingService,
        settings: &EditorSettings,
    ) -> Self {
        Self {
            editor,
            menu: MenuController::new(),
            keybindings,
            menu_state: MenuState::default(),
            viewport: Viewport::default(),
            status: None,
            tab_size: settings.tab_size,
            scroll_lines: settings.scroll_lines.max(1),
            show_line_numbers: settings.show_line_numbers,
            last_menu_area: None,
            last_menu_title_area: None,
            pending_open: None,
        }
    }

    pub fn editor(&self) -> &EditorController {
        &self.editor
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu_state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// File to load once the first frame is on screen.
    pub fn open_on_start(&mut self, path: PathBuf) {
        self.pending_open = Some(path);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        render::draw(self, frame);
    }

    pub fn handle_event(&mut self, event: Event, dialogs: &mut dyn Dialogs) -> Flow {
        match event {
            Event::Key(key) => self.handle_key(key, dialogs),
            Event::Paste(text) => {
                self.close_menu();
                self.run_command(Command::InsertText(text), dialogs)
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, dialogs),
            Event::Resize(..) | Event::FocusGained | Event::FocusLost => Flow::Continue,
        }
    }

    fn handle_key(&mut self, event: KeyEvent, dialogs: &mut dyn Dialogs) -> Flow {
        if event.kind != KeyEventKind::Press {
            return Flow::Continue;
        }
        if self.menu_state.open {
            return self.handle_menu_key(event, dialogs);
        }

        let key = Key::from(event);
        if let Some(command) = self
            .keybindings
            .resolve(KeybindingContext::Editor, &key)
            .cloned()
        {
            if command == Command::OpenMenu {
                self.open_menu();
                return Flow::Continue;
            }
            return self.run_command(command, dialogs);
        }

        match event.code {
            KeyCode::Char(ch)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.run_command(Command::InsertChar(ch), dialogs)
            }
            _ => Flow::Continue,
        }
    }

    fn handle_menu_key(&mut self, event: KeyEvent, dialogs: &mut dyn Dialogs) -> Flow {
        match event.code {
            KeyCode::Esc | KeyCode::F(10) => {
                self.close_menu();
                Flow::Continue
            }
            KeyCode::Up => {
                self.menu_state.selected = self.menu.next_selectable(self.menu_state.selected, -1);
                Flow::Continue
            }
            KeyCode::Down | KeyCode::Tab => {
                self.menu_state.selected = self.menu.next_selectable(self.menu_state.selected, 1);
                Flow::Continue
            }
            KeyCode::Enter => {
                let index = self.menu_state.selected;
                self.activate_menu_item(index, dialogs)
            }
            _ => Flow::Continue,
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, dialogs: &mut dyn Dialogs) -> Flow {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_by(-(self.scroll_lines as isize));
                Flow::Continue
            }
            MouseEventKind::ScrollDown => {
                self.scroll_by(self.scroll_lines as isize);
                Flow::Continue
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let (x, y) = (event.column, event.row);
                if contains(self.last_menu_title_area, x, y) {
                    if self.menu_state.open {
                        self.close_menu();
                    } else {
                        self.open_menu();
                    }
                    return Flow::Continue;
                }
                if self.menu_state.open {
                    if let Some(area) = self.last_menu_area.filter(|&r| contains(Some(r), x, y)) {
                        // Top border sits on `area.y`.
                        if y > area.y {
                            let index = usize::from(y - area.y - 1);
                            return self.activate_menu_item(index, dialogs);
                        }
                        return Flow::Continue;
                    }
                    self.close_menu();
                }
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn activate_menu_item(&mut self, index: usize, dialogs: &mut dyn Dialogs) -> Flow {
        if self.menu.command_at(index).is_none() {
            return Flow::Continue;
        }
        self.close_menu();
        self.status = None;
        let outcome = self.menu.activate(index, &mut self.editor, dialogs);
        self.finish(outcome.unwrap_or(Ok(Flow::Continue)))
    }

    fn run_command(&mut self, command: Command, dialogs: &mut dyn Dialogs) -> Flow {
        if command.is_file_command() {
            self.status = None;
        }
        if self.viewport.height > 0 {
            self.editor.set_page_rows(self.viewport.height);
        }
        let outcome = self.editor.dispatch(command, dialogs);
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Result<Flow, EditorError>) -> Flow {
        let flow = outcome.unwrap_or_else(|err| {
            self.status = Some(err.to_string());
            Flow::Continue
        });
        self.follow_cursor();
        flow
    }

    fn open_menu(&mut self) {
        self.menu_state = MenuState {
            open: true,
            selected: self.menu.first_selectable(),
        };
    }

    fn close_menu(&mut self) {
        self.menu_state.open = false;
    }

    fn scroll_by(&mut self, delta: isize) {
        let max_top = self.editor.buffer().len_lines().saturating_sub(1);
        let top = self.viewport.top as isize + delta;
        self.viewport.top = top.clamp(0, max_top as isize) as usize;
    }

    /// Moves the viewport so the cursor is visible. Uses the text area size
    /// from the last frame.
    pub(super) fn follow_cursor(&mut self) {
        let buffer = self.editor.buffer();
        let (row, col) = buffer.cursor();
        let x = buffer
            .line(row)
            .map(|line| render::display_width(&line, col, self.tab_size))
            .unwrap_or(0);

        let height = self.viewport.height.max(1);
        if row < self.viewport.top {
            self.viewport.top = row;
        } else if row >= self.viewport.top + height {
            self.viewport.top = row + 1 - height;
        }

        let width = self.viewport.width.max(1);
        if x < self.viewport.left {
            self.viewport.left = x;
        } else if x >= self.viewport.left + width {
            self.viewport.left = x + 1 - width;
        }
    }

    fn take_pending_open(&mut self) -> Option<PathBuf> {
        self.pending_open.take()
    }

    /// Directory the path prompts start in.
    fn dialog_dir(&self) -> PathBuf {
        self.editor
            .document()
            .file_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }
}

fn contains(area: Option<Rect>, x: u16, y: u16) -> bool {
    area.is_some_and(|r| render::rect_contains(r, x, y))
}

/// Draw → read one event → dispatch, until Exit or the event source fails.
pub fn run<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    app: &mut App,
    window_title: bool,
) -> io::Result<()> {
    let backdrop = terminal.draw(|frame| app.render(frame))?.buffer.clone();
    {
        let dir = app.dialog_dir();
        let mut dialogs = TuiDialogs::new(terminal, events, &backdrop, dir, window_title);
        dialogs.set_title(&app.editor.title());
        if let Some(path) = app.take_pending_open() {
            if let Err(err) = app.editor.open_path(&path, &mut dialogs) {
                app.status = Some(err.to_string());
            }
            app.follow_cursor();
        }
    }

    loop {
        let backdrop = terminal.draw(|frame| app.render(frame))?.buffer.clone();
        let event = events.next_event()?;
        let dir = app.dialog_dir();
        let mut dialogs = TuiDialogs::new(terminal, events, &backdrop, dir, window_title);
        if app.handle_event(event, &mut dialogs) == Flow::Exit {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tui/app.rs"]
mod tests;
