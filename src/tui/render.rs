//! 渲染：菜单栏 + 文本区 + 状态栏，以及下拉菜单

use super::app::App;
use crate::core::Command;
use crate::kernel::MenuItem;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub bar_bg: Color,
    pub bar_fg: Color,
    pub accent_fg: Color,
    pub muted_fg: Color,
    pub error_fg: Color,
    pub border: Color,
    pub popup_bg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(0x23, 0x23, 0x23),
            fg: Color::White,
            bar_bg: Color::Rgb(0x33, 0x33, 0x33),
            bar_fg: Color::Rgb(0xcc, 0xcc, 0xcc),
            accent_fg: Color::Rgb(0x4e, 0xa1, 0xff),
            muted_fg: Color::DarkGray,
            error_fg: Color::Rgb(0xf4, 0x47, 0x47),
            border: Color::Rgb(0x55, 0x55, 0x55),
            popup_bg: Color::Rgb(0x2d, 0x2d, 0x2d),
            selected_bg: Color::Rgb(0x09, 0x47, 0x71),
            selected_fg: Color::White,
        }
    }
}

pub(super) fn draw(app: &mut App, frame: &mut Frame) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
        area,
    );
    if area.width == 0 || area.height < 3 {
        app.last_menu_area = None;
        app.last_menu_title_area = None;
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_menu_bar(app, frame, rows[0], &theme);
    render_text_area(app, frame, rows[1], &theme);
    render_status_line(app, frame, rows[2], &theme);
    render_dropdown(app, frame, area, &theme);
}

fn render_menu_bar(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let bar_style = Style::default().bg(theme.bar_bg).fg(theme.bar_fg);
    let menu_style = if app.menu_state.open {
        Style::default().bg(theme.selected_bg).fg(theme.selected_fg)
    } else {
        bar_style
    };

    let menu_title = format!(" {} ", app.menu.file_menu().label);
    let menu_width = menu_title.width();
    let title = app.editor.title();
    let used = menu_width + title.width();
    let gap = (area.width as usize).saturating_sub(used + 1);
    let line = Line::from(vec![
        Span::styled(menu_title, menu_style),
        Span::raw(" ".repeat(gap)),
        Span::styled(title, bar_style.add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line).style(bar_style), area);

    let width = (menu_width as u16).min(area.width);
    app.last_menu_title_area = Some(Rect::new(area.x, area.y, width, 1));
}

fn render_text_area(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let buffer = app.editor.buffer();
    let total = buffer.len_lines();
    let gutter = if app.show_line_numbers {
        (total.to_string().len() + 1) as u16
    } else {
        0
    };
    // Last column holds the scrollbar.
    let text_width = area.width.saturating_sub(gutter + 1);
    let text = Rect::new(area.x + gutter, area.y, text_width, area.height);

    app.viewport.height = text.height as usize;
    app.viewport.width = text.width as usize;
    app.viewport.top = app.viewport.top.min(total.saturating_sub(1));

    let text_style = Style::default().bg(theme.bg).fg(theme.fg);
    let gutter_style = Style::default().bg(theme.bg).fg(theme.muted_fg);
    let mut lines = Vec::with_capacity(text.height as usize);
    let mut numbers = Vec::with_capacity(text.height as usize);
    let end = (app.viewport.top + text.height as usize).min(total);
    for row in app.viewport.top..end {
        let content = buffer.line(row).unwrap_or_default();
        let visible = visible_slice(&content, app.viewport.left, text.width as usize, app.tab_size);
        lines.push(Line::from(Span::styled(visible, text_style)));
        if gutter > 0 {
            let label = format!("{:>width$} ", row + 1, width = gutter as usize - 1);
            numbers.push(Line::from(Span::styled(label, gutter_style)));
        }
    }
    frame.render_widget(Paragraph::new(lines).style(text_style), text);
    if gutter > 0 {
        let gutter_area = Rect::new(area.x, area.y, gutter.min(area.width), area.height);
        frame.render_widget(Paragraph::new(numbers).style(gutter_style), gutter_area);
    }

    if total > text.height as usize && area.width > gutter {
        let mut state = ScrollbarState::new(total.saturating_sub(text.height as usize) + 1)
            .position(app.viewport.top)
            .viewport_content_length(text.height as usize);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .thumb_style(Style::default().fg(theme.border));
        frame.render_stateful_widget(scrollbar, area, &mut state);
    }

    if app.menu_state.open {
        return;
    }
    let (row, col) = buffer.cursor();
    if row < app.viewport.top || row >= end {
        return;
    }
    let x = buffer
        .line(row)
        .map(|line| display_width(&line, col, app.tab_size))
        .unwrap_or(0);
    if x < app.viewport.left || x >= app.viewport.left + text.width as usize {
        return;
    }
    frame.set_cursor_position((
        text.x + (x - app.viewport.left) as u16,
        text.y + (row - app.viewport.top) as u16,
    ));
}

fn render_status_line(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let bar_style = Style::default().bg(theme.bar_bg).fg(theme.bar_fg);
    let (row, col) = app.editor.buffer().cursor();

    let mut spans = vec![Span::raw(format!(" Ln {}, Col {}", row + 1, col + 1))];
    if let Some(status) = app.status.as_deref() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            status.replace('\n', " "),
            bar_style.fg(theme.error_fg),
        ));
    }

    let hint = app
        .keybindings
        .shortcut_for(&Command::OpenMenu)
        .map(|key| format!("{} Menu ", key.label()))
        .unwrap_or_default();
    let used: usize = spans.iter().map(|span| span.content.width()).sum();
    let gap = (area.width as usize).saturating_sub(used + hint.width());
    if gap > 0 {
        spans.push(Span::raw(" ".repeat(gap)));
        spans.push(Span::styled(hint, bar_style.fg(theme.muted_fg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), area);
}

fn render_dropdown(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    if !app.menu_state.open {
        app.last_menu_area = None;
        return;
    }

    let items = &app.menu.file_menu().items;
    let rows: Vec<(String, String)> = items
        .iter()
        .map(|item| match item {
            MenuItem::Action { label, command } => {
                let shortcut = app
                    .keybindings
                    .shortcut_for(command)
                    .map(|key| key.label())
                    .unwrap_or_default();
                (label.to_string(), shortcut)
            }
            MenuItem::Separator => (String::new(), String::new()),
        })
        .collect();

    let label_w = rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
    let shortcut_w = rows.iter().map(|(_, s)| s.width()).max().unwrap_or(0);
    let inner_w = (label_w + shortcut_w + 6).min(u16::MAX as usize) as u16;
    let width = inner_w.saturating_add(2).min(area.width).max(3);
    let height = (rows.len() as u16).saturating_add(2).min(area.height.saturating_sub(1)).max(3);
    let popup = Rect::new(area.x, area.y + 1, width, height);
    app.last_menu_area = Some(popup);

    frame.render_widget(Clear, popup);
    let base_style = Style::default().bg(theme.popup_bg).fg(theme.fg);
    let selected_style = Style::default().bg(theme.selected_bg).fg(theme.selected_fg);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border).bg(theme.popup_bg))
            .style(base_style),
        popup,
    );

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );
    let pad_to = inner.width as usize;
    let mut lines = Vec::with_capacity(rows.len());
    for (idx, (label, shortcut)) in rows.iter().enumerate().take(inner.height as usize) {
        if items[idx].is_separator() {
            lines.push(Line::from(Span::styled(
                "─".repeat(pad_to),
                Style::default().fg(theme.border),
            )));
            continue;
        }
        let selected = idx == app.menu_state.selected;
        let prefix = if selected { "▸ " } else { "  " };
        let mut text = format!("{prefix}{label}");
        let fill = pad_to.saturating_sub(text.width() + shortcut.width() + 1);
        text.push_str(&" ".repeat(fill));
        text.push_str(shortcut);
        text.push(' ');
        let style = if selected { selected_style } else { base_style };
        lines.push(Line::from(Span::styled(text, style)));
    }
    frame.render_widget(Paragraph::new(lines).style(base_style), inner);
}

pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.max(10.min(area.width)).min(area.width);
    let height = height.max(3.min(area.height)).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

pub(super) fn rect_contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

fn tab_width(x: usize, tab_size: u8) -> usize {
    let tab = usize::from(tab_size.max(1));
    tab - x % tab
}

/// Display columns taken by the first `col` chars of `line`.
pub fn display_width(line: &str, col: usize, tab_size: u8) -> usize {
    line.chars().take(col).fold(0, |x, ch| {
        x + match ch {
            '\t' => tab_width(x, tab_size),
            _ => ch.width().unwrap_or(0),
        }
    })
}

/// The part of `line` shown in a window `width` columns wide starting at
/// display column `left`. Tabs become spaces; a wide char cut by the window
/// edge becomes a space.
pub fn visible_slice(line: &str, left: usize, width: usize, tab_size: u8) -> String {
    let right = left + width;
    let mut out = String::new();
    let mut x = 0usize;
    for ch in line.chars() {
        if x >= right {
            break;
        }
        let w = match ch {
            '\t' => tab_width(x, tab_size),
            _ => ch.width().unwrap_or(0),
        };
        let start = x;
        x += w;
        if w == 0 || x <= left {
            continue;
        }
        if ch == '\t' {
            let from = start.max(left);
            out.push_str(&" ".repeat(x.min(right) - from));
        } else if start < left || x > right {
            out.push_str(&" ".repeat(x.min(right) - start.max(left)));
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/tui/render.rs"]
mod tests;
