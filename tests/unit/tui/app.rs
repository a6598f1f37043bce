use super::*;
use crate::kernel::services::adapters::scripted::ScriptedDialogs;
use crate::kernel::EditorOptions;
use crate::tui::events::{ctrl, key, typed, ScriptedEvents};
use crossterm::event::KeyEvent;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use std::fs;
use tempfile::{tempdir, TempDir};

fn app(dir: &TempDir) -> App {
    let editor = EditorController::new(dir.path().to_path_buf(), EditorOptions::default());
    App::new(
        editor,
        KeybindingService::with_defaults(),
        &EditorSettings::default(),
    )
}

fn terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).unwrap()
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    let width = buffer.area.width as usize;
    let start = y as usize * width;
    buffer.content[start..start + width]
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height).map(|y| row_text(buffer, y)).collect()
}

fn ctrl_shift(ch: char) -> Event {
    Event::Key(KeyEvent::new(
        KeyCode::Char(ch),
        KeyModifiers::CONTROL | KeyModifiers::SHIFT,
    ))
}

fn feed(app: &mut App, dialogs: &mut ScriptedDialogs, events: Vec<Event>) -> Flow {
    let mut flow = Flow::Continue;
    for event in events {
        flow = app.handle_event(event, dialogs);
    }
    flow
}

#[test]
fn first_frame_shows_menu_bar_title_and_status() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut terminal = terminal(60, 10);

    terminal.draw(|f| app.render(f)).unwrap();
    let rows = screen(&terminal);

    assert!(rows[0].starts_with(" File "));
    assert!(rows[0].contains("untitled* - SimEdit"));
    assert!(rows[9].contains("Ln 1, Col 1"));
    assert!(rows[9].contains("F10 Menu"));
}

#[test]
fn typing_inserts_text_and_moves_cursor() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();
    let mut terminal = terminal(40, 8);

    feed(&mut app, &mut dialogs, typed("Hi there"));
    feed(&mut app, &mut dialogs, vec![key(KeyCode::Enter), key(KeyCode::Char('x'))]);
    terminal.draw(|f| app.render(f)).unwrap();
    let rows = screen(&terminal);

    assert_eq!(app.editor().buffer().text(), "Hi there\nx");
    assert!(app.editor().is_file_modified());
    assert!(rows[1].starts_with("Hi there"));
    assert!(rows[2].starts_with('x'));
    assert!(rows[7].contains("Ln 2, Col 2"));
}

#[test]
fn key_release_events_are_ignored() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();

    let release = Event::Key(KeyEvent::new_with_kind(
        KeyCode::Char('a'),
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ));
    app.handle_event(release, &mut dialogs);

    assert!(app.editor().buffer().is_empty());
}

#[test]
fn paste_inserts_whole_text() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();

    app.handle_event(Event::Paste("one\r\ntwo".to_string()), &mut dialogs);

    assert_eq!(app.editor().buffer().text(), "one\ntwo");
    assert_eq!(app.editor().buffer().cursor(), (1, 3));
}

#[test]
fn f10_opens_dropdown_with_shortcuts() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();
    let mut terminal = terminal(60, 12);

    app.handle_event(key(KeyCode::F(10)), &mut dialogs);
    terminal.draw(|f| app.render(f)).unwrap();
    let text = screen(&terminal).join("\n");

    assert!(app.menu_state().open);
    assert_eq!(app.menu_state().selected, 0);
    assert!(text.contains("▸ New File"));
    assert!(text.contains("Open File"));
    assert!(text.contains("Save As"));
    assert!(text.contains("Ctrl+Shift+S"));
    assert!(text.contains("Exit"));
    assert!(text.contains("Ctrl+Q"));
}

#[test]
fn menu_navigation_wraps_and_skips_separator() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();

    app.handle_event(key(KeyCode::F(10)), &mut dialogs);
    app.handle_event(key(KeyCode::Up), &mut dialogs);
    assert_eq!(app.menu_state().selected, 5);

    app.handle_event(key(KeyCode::Up), &mut dialogs);
    assert_eq!(app.menu_state().selected, 3);

    app.handle_event(key(KeyCode::Esc), &mut dialogs);
    assert!(!app.menu_state().open);
}

#[test]
fn keys_do_not_reach_buffer_while_menu_is_open() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();

    feed(
        &mut app,
        &mut dialogs,
        vec![key(KeyCode::F(10)), key(KeyCode::Char('a'))],
    );

    assert!(app.editor().buffer().is_empty());
    assert!(app.menu_state().open);
}

#[test]
fn menu_save_as_writes_chosen_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("notes.txt");
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_save(Some(target.clone()));

    feed(&mut app, &mut dialogs, typed("abc"));
    let mut events = vec![key(KeyCode::F(10))];
    events.extend(std::iter::repeat(key(KeyCode::Down)).take(3));
    events.push(key(KeyCode::Enter));
    feed(&mut app, &mut dialogs, events);

    assert_eq!(fs::read_to_string(&target).unwrap(), "abc");
    assert!(!app.menu_state().open);
    assert_eq!(app.editor().document().file_path, target);
    assert!(!app.editor().is_file_modified());
}

#[test]
fn menu_exit_ends_the_loop() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();

    let flow = feed(
        &mut app,
        &mut dialogs,
        vec![key(KeyCode::F(10)), key(KeyCode::Up), key(KeyCode::Enter)],
    );

    assert_eq!(flow, Flow::Exit);
}

#[test]
fn clicking_file_title_toggles_menu() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();
    let mut terminal = terminal(60, 12);
    terminal.draw(|f| app.render(f)).unwrap();

    let click = |column, row| {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    };

    app.handle_event(click(2, 0), &mut dialogs);
    assert!(app.menu_state().open);

    terminal.draw(|f| app.render(f)).unwrap();
    // Border is row 1, "New File" is row 2.
    let flow = app.handle_event(click(3, 2), &mut dialogs);
    assert_eq!(flow, Flow::Continue);
    assert!(!app.menu_state().open);
    assert_eq!(app.editor().title(), "untitled* - SimEdit");
}

#[test]
fn scrolling_moves_viewport_without_moving_cursor() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();
    let mut terminal = terminal(40, 8);

    let text: String = (1..=30).map(|n| format!("line {n}\n")).collect();
    app.handle_event(Event::Paste(text), &mut dialogs);
    app.handle_event(key(KeyCode::Char('x')), &mut dialogs);
    terminal.draw(|f| app.render(f)).unwrap();
    app.handle_event(ctrl_home(), &mut dialogs);
    terminal.draw(|f| app.render(f)).unwrap();
    assert_eq!(app.viewport().top, 0);

    let scroll = Event::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 5,
        row: 3,
        modifiers: KeyModifiers::NONE,
    });
    app.handle_event(scroll, &mut dialogs);
    terminal.draw(|f| app.render(f)).unwrap();

    assert_eq!(app.viewport().top, 3);
    assert_eq!(app.editor().buffer().cursor(), (0, 0));
    assert!(screen(&terminal)[1].starts_with("line 4"));
}

fn ctrl_home() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Home, KeyModifiers::CONTROL))
}

#[test]
fn line_numbers_use_a_gutter() {
    let dir = tempdir().unwrap();
    let editor = EditorController::new(dir.path().to_path_buf(), EditorOptions::default());
    let settings = EditorSettings {
        show_line_numbers: true,
        ..EditorSettings::default()
    };
    let mut app = App::new(editor, KeybindingService::with_defaults(), &settings);
    let mut dialogs = ScriptedDialogs::new();
    let mut terminal = terminal(30, 6);

    app.handle_event(Event::Paste("a\nb".to_string()), &mut dialogs);
    terminal.draw(|f| app.render(f)).unwrap();
    let rows = screen(&terminal);

    assert!(rows[1].starts_with("1 a"));
    assert!(rows[2].starts_with("2 b"));
}

#[test]
fn run_saves_through_the_path_prompt() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut terminal = terminal(60, 12);

    let mut script = typed("hello");
    script.push(ctrl_shift('s'));
    // The prompt starts at the document's directory.
    script.extend(typed("out.txt"));
    script.push(key(KeyCode::Enter));
    script.push(ctrl('q'));
    let mut events = ScriptedEvents::new(script);

    run(&mut terminal, &mut events, &mut app, false).unwrap();

    let target = dir.path().join("out.txt");
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
    assert_eq!(app.editor().document().file_path, target);
    assert_eq!(events.remaining(), 0);
}

#[test]
fn run_cancelled_prompt_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut terminal = terminal(60, 12);

    let mut script = typed("hello");
    script.push(ctrl_shift('s'));
    script.push(key(KeyCode::Esc));
    script.push(ctrl('q'));
    let mut events = ScriptedEvents::new(script);

    run(&mut terminal, &mut events, &mut app, false).unwrap();

    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    assert!(app.editor().is_file_modified());
}

#[test]
fn run_declined_discard_keeps_buffer() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut terminal = terminal(60, 12);

    let mut script = typed("draft");
    script.push(ctrl('n'));
    script.push(key(KeyCode::Char('n')));
    script.push(ctrl('q'));
    let mut events = ScriptedEvents::new(script);

    run(&mut terminal, &mut events, &mut app, false).unwrap();

    assert_eq!(app.editor().buffer().text(), "draft");
    assert!(app.editor().is_file_modified());
}

#[test]
fn run_reports_external_change_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.txt");
    fs::write(&path, "base").unwrap();

    let mut app = app(&dir);
    app.editor
        .open_path(&path, &mut ScriptedDialogs::new())
        .unwrap();
    let mut terminal = terminal(60, 12);

    let mut script = vec![key(KeyCode::End), key(KeyCode::Char('!'))];
    script.push(ctrl('s'));
    // Dismisses the error dialog.
    script.push(key(KeyCode::Enter));
    script.push(ctrl('q'));
    let mut events = ScriptedEvents::new(script);

    fs::write(&path, "theirs").unwrap();
    run(&mut terminal, &mut events, &mut app, false).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "theirs");
    assert!(app.status().unwrap().contains("use Save As"));
    assert_eq!(app.editor().buffer().text(), "base!");
}

#[test]
fn run_opens_startup_path_before_first_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("start.txt");
    fs::write(&path, "ready\n").unwrap();

    let mut app = app(&dir);
    app.open_on_start(path.clone());
    let mut terminal = terminal(60, 12);
    let mut events = ScriptedEvents::new(vec![ctrl('q')]);

    run(&mut terminal, &mut events, &mut app, false).unwrap();

    assert_eq!(app.editor().buffer().text(), "ready\n");
    assert_eq!(app.editor().document().file_path, path);
    assert!(screen(&terminal)[1].starts_with("ready"));
}

#[test]
fn run_startup_path_missing_shows_error_and_stays_untitled() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    app.open_on_start(dir.path().join("missing.txt"));
    let mut terminal = terminal(60, 12);
    // Enter dismisses the error dialog.
    let mut events = ScriptedEvents::new(vec![key(KeyCode::Enter), ctrl('q')]);

    run(&mut terminal, &mut events, &mut app, false).unwrap();

    assert_eq!(app.editor().title(), "untitled* - SimEdit");
    assert!(app.status().unwrap().starts_with("Cannot open"));
}

#[test]
fn run_stops_when_events_run_out() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut terminal = terminal(40, 8);
    let mut events = ScriptedEvents::new(typed("a"));

    let err = run(&mut terminal, &mut events, &mut app, false).unwrap_err();

    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    assert_eq!(app.editor().buffer().text(), "a");
}

#[test]
fn page_down_moves_by_visible_rows() {
    let dir = tempdir().unwrap();
    let mut app = app(&dir);
    let mut dialogs = ScriptedDialogs::new();
    // 8 rows minus menu bar and status line.
    let mut terminal = terminal(40, 8);
    let text: String = (0..100).map(|i| format!("line {i}\n")).collect();

    feed(
        &mut app,
        &mut dialogs,
        vec![
            Event::Paste(text),
            Event::Key(KeyEvent::new(KeyCode::Home, KeyModifiers::CONTROL)),
        ],
    );
    terminal.draw(|f| app.render(f)).unwrap();
    feed(&mut app, &mut dialogs, vec![key(KeyCode::PageDown)]);

    assert_eq!(app.editor().buffer().cursor(), (6, 0));
}
