//! 终端模态对话框
//!
//! 每个对话框都是一个嵌套的 draw/read 循环：背景是主界面最后一帧，
//! 弹窗画在上面，直到用户作出选择才返回。

use super::events::EventSource;
use super::render::{centered_rect, Theme};
use crate::kernel::services::ports::dialog::Dialogs;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::path::{PathBuf, MAIN_SEPARATOR};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PROMPT: &str = "> ";

pub struct TuiDialogs<'a, B: Backend, E: EventSource> {
    terminal: &'a mut Terminal<B>,
    events: &'a mut E,
    backdrop: &'a Buffer,
    start_dir: PathBuf,
    window_title: bool,
}

impl<'a, B: Backend, E: EventSource> TuiDialogs<'a, B, E> {
    /// `window_title` controls whether `set_title` reaches the real terminal.
    pub fn new(
        terminal: &'a mut Terminal<B>,
        events: &'a mut E,
        backdrop: &'a Buffer,
        start_dir: PathBuf,
        window_title: bool,
    ) -> Self {
        Self {
            terminal,
            events,
            backdrop,
            start_dir,
            window_title,
        }
    }

    fn run_modal<M: Modal>(&mut self, mut modal: M) -> M::Output {
        let backdrop = self.backdrop;
        loop {
            let drawn = self.terminal.draw(|frame| {
                let area = frame.area();
                if backdrop.area == area {
                    frame.buffer_mut().merge(backdrop);
                }
                modal.draw(frame, area);
            });
            if let Err(err) = drawn {
                tracing::warn!(error = %err, "dialog draw failed");
                return modal.cancel();
            }

            match self.events.next_event() {
                Ok(event) => {
                    if let Some(output) = modal.handle(event) {
                        return output;
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "dialog interrupted");
                    return modal.cancel();
                }
            }
        }
    }

    fn path_prompt(&mut self, title: &'static str, action: &'static str) -> Option<PathBuf> {
        let mut initial = self.start_dir.to_string_lossy().into_owned();
        if !initial.is_empty() && !initial.ends_with(MAIN_SEPARATOR) {
            initial.push(MAIN_SEPARATOR);
        }
        self.run_modal(PathPrompt {
            title,
            action,
            input: PathInput::new(initial),
        })
    }
}

impl<B: Backend, E: EventSource> Dialogs for TuiDialogs<'_, B, E> {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.run_modal(MessageBox {
            title,
            message,
            kind: MessageKind::Confirm,
        })
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.run_modal(MessageBox {
            title,
            message,
            kind: MessageKind::Error,
        });
    }

    fn ask_open_path(&mut self) -> Option<PathBuf> {
        self.path_prompt("Open File", "Open")
    }

    fn ask_save_path(&mut self) -> Option<PathBuf> {
        self.path_prompt("Save As", "Save")
    }

    fn set_title(&mut self, title: &str) {
        if !self.window_title {
            return;
        }
        if let Err(err) = crossterm::execute!(std::io::stdout(), crossterm::terminal::SetTitle(title)) {
            tracing::debug!(error = %err, "set window title failed");
        }
    }
}

trait Modal {
    type Output;

    fn draw(&self, frame: &mut Frame, area: Rect);

    /// `Some` closes the dialog with that answer.
    fn handle(&mut self, event: Event) -> Option<Self::Output>;

    /// Answer used when the event source or terminal goes away.
    fn cancel(&self) -> Self::Output;
}

fn pressed(event: Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    Confirm,
    Error,
}

struct MessageBox<'m> {
    title: &'m str,
    message: &'m str,
    kind: MessageKind,
}

impl Modal for MessageBox<'_> {
    type Output = bool;

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let theme = Theme::default();
        let lines: Vec<&str> = self.message.lines().collect();
        let text_w = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        let width = (text_w + 6).clamp(30, 70) as u16;
        let height = lines.len() as u16 + 5;
        let popup = centered_rect(width, height, area);
        if popup.width < 4 || popup.height < 3 {
            return;
        }

        frame.render_widget(Clear, popup);
        let base_style = Style::default().bg(theme.popup_bg).fg(theme.fg);
        let title_fg = match self.kind {
            MessageKind::Confirm => theme.accent_fg,
            MessageKind::Error => theme.error_fg,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border).bg(theme.popup_bg))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
            ))
            .style(base_style);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut content: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
        content.push(Line::raw(""));
        let key_style = Style::default().fg(theme.accent_fg);
        let muted = Style::default().fg(theme.muted_fg);
        content.push(match self.kind {
            MessageKind::Confirm => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Yes  "),
                Span::styled("[N]", muted),
                Span::raw(" No"),
            ]),
            MessageKind::Error => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" OK"),
            ]),
        });
        frame.render_widget(
            Paragraph::new(content)
                .style(base_style)
                .wrap(Wrap { trim: false }),
            inner,
        );
    }

    fn handle(&mut self, event: Event) -> Option<bool> {
        let key = pressed(event)?;
        match (self.kind, key.code) {
            (MessageKind::Confirm, KeyCode::Char('y' | 'Y') | KeyCode::Enter) => Some(true),
            (MessageKind::Confirm, KeyCode::Char('n' | 'N') | KeyCode::Esc) => Some(false),
            (MessageKind::Error, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) => {
                Some(false)
            }
            _ => None,
        }
    }

    fn cancel(&self) -> bool {
        false
    }
}

struct PathPrompt {
    title: &'static str,
    action: &'static str,
    input: PathInput,
}

impl Modal for PathPrompt {
    type Output = Option<PathBuf>;

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let theme = Theme::default();
        let width = area.width.saturating_mul(6) / 10;
        let popup = centered_rect(width, 6, area);
        if popup.width < 12 || popup.height < 4 {
            return;
        }

        frame.render_widget(Clear, popup);
        let base_style = Style::default().bg(theme.popup_bg).fg(theme.fg);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border).bg(theme.popup_bg))
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(theme.accent_fg).add_modifier(Modifier::BOLD),
            ))
            .style(base_style);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let field_w = (inner.width as usize).saturating_sub(PROMPT.width());
        let (start, end) = self.input.window(field_w);
        let visible = &self.input.value[start..end];
        let before_w = self.input.value[start..self.input.cursor].width();

        let lines = vec![
            Line::from(vec![Span::raw(PROMPT), Span::raw(visible)]),
            Line::raw(""),
            Line::from(vec![
                Span::styled("[Enter]", Style::default().fg(theme.accent_fg)),
                Span::raw(format!(" {}  ", self.action)),
                Span::styled("[Esc]", Style::default().fg(theme.muted_fg)),
                Span::raw(" Cancel"),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).style(base_style), inner);

        let x = inner.x + (PROMPT.width() + before_w).min(inner.width.saturating_sub(1) as usize) as u16;
        frame.set_cursor_position((x, inner.y));
    }

    fn handle(&mut self, event: Event) -> Option<Option<PathBuf>> {
        let key = match event {
            Event::Paste(text) => {
                self.input.insert_str(&text);
                return None;
            }
            other => pressed(other)?,
        };
        let input = &mut self.input;
        match key.code {
            KeyCode::Enter => return Some(input.submit()),
            KeyCode::Esc => return Some(None),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                input.insert(ch);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => input.clear(),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.left(),
            KeyCode::Right => input.right(),
            KeyCode::Home => input.home(),
            KeyCode::End => input.end(),
            _ => {}
        }
        None
    }

    fn cancel(&self) -> Option<PathBuf> {
        None
    }
}

/// Single-line text field. `cursor` is a byte offset on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInput {
    pub value: String,
    pub cursor: usize,
}

impl PathInput {
    pub fn new(value: String) -> Self {
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn insert(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert(ch);
        }
    }

    pub fn backspace(&mut self) {
        let prev = self.prev_boundary();
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        let next = self.next_boundary();
        self.value.drain(self.cursor..next);
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Trimmed value as a path; `None` when blank.
    pub fn submit(&self) -> Option<PathBuf> {
        let value = self.value.trim();
        (!value.is_empty()).then(|| PathBuf::from(value))
    }

    /// Byte range `[start, end)` that fits in `width` columns and keeps the
    /// cursor visible.
    pub fn window(&self, width: usize) -> (usize, usize) {
        if width == 0 {
            return (self.cursor, self.cursor);
        }
        // Reserve one column for the cursor itself.
        let mut start = self.cursor;
        let mut used = 1usize;
        for (idx, ch) in self.value[..self.cursor].char_indices().rev() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            start = idx;
        }

        let mut end = self.cursor;
        let mut used = self.value[start..self.cursor].width();
        for (idx, ch) in self.value[self.cursor..].char_indices() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            end = self.cursor + idx + ch.len_utf8();
        }
        (start, end)
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|ch| self.cursor + ch.len_utf8())
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tui/dialogs.rs"]
mod tests;
