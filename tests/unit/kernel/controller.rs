use super::*;
use crate::kernel::services::adapters::scripted::{Prompt, ScriptedDialogs};
use crate::kernel::services::ports::file::Result as FileResult;
use std::fs;
use tempfile::{tempdir, TempDir};

fn controller(dir: &TempDir) -> EditorController {
    EditorController::new(dir.path().to_path_buf(), EditorOptions::default())
}

fn type_text(editor: &mut EditorController, dialogs: &mut ScriptedDialogs, text: &str) {
    for ch in text.chars() {
        editor
            .dispatch(Command::InsertChar(ch), dialogs)
            .expect("typing never fails");
    }
}

struct ReadOnlyDisk;

impl FileProvider for ReadOnlyDisk {
    fn read_file(&self, path: &Path) -> FileResult<String> {
        Err(FileError::NotFound(path.to_path_buf()))
    }

    fn write_file(&self, _path: &Path, _content: &str) -> FileResult<()> {
        Err(FileError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

#[test]
fn starts_untitled_and_clean() {
    let dir = tempdir().unwrap();
    let editor = controller(&dir);

    assert_eq!(editor.title(), "untitled* - SimEdit");
    assert_eq!(editor.document().file_path, dir.path().join("untitled"));
    assert!(editor.buffer().is_empty());
    assert!(!editor.is_file_modified());
}

#[test]
fn typing_marks_untitled_document_modified() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();

    type_text(&mut editor, &mut dialogs, "hi");

    assert!(editor.is_file_modified());
    assert_eq!(editor.document().display_name, "untitled*");
}

#[test]
fn cursor_motion_alone_is_not_a_modification() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "one\ntwo").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    editor.open_path(&path, &mut dialogs).unwrap();

    editor.dispatch(Command::CursorDown, &mut dialogs).unwrap();
    editor.dispatch(Command::CursorLineEnd, &mut dialogs).unwrap();

    assert!(!editor.is_file_modified());
    assert_eq!(editor.buffer().cursor(), (1, 3));
}

#[test]
fn new_file_when_clean_resets_without_prompt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    editor.open_path(&path, &mut dialogs).unwrap();

    assert!(editor.new_file(&mut dialogs));

    assert_eq!(dialogs.confirm_count(), 0);
    assert!(editor.buffer().is_empty());
    assert_eq!(editor.document().display_name, "untitled*");
    assert!(editor.document().original_text.is_empty());
    assert_eq!(dialogs.title(), Some("untitled* - SimEdit"));
}

#[test]
fn new_file_declined_keeps_buffer_and_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_confirm(false);
    editor.open_path(&path, &mut dialogs).unwrap();
    type_text(&mut editor, &mut dialogs, "!");
    let before = editor.document().clone();

    assert!(!editor.new_file(&mut dialogs));

    assert_eq!(dialogs.confirm_count(), 1);
    assert_eq!(editor.buffer().text(), "!hello");
    assert_eq!(editor.document(), &before);
    assert!(editor.is_file_modified());
}

#[test]
fn new_file_confirmed_discards_changes() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_confirm(true);
    type_text(&mut editor, &mut dialogs, "draft");

    assert!(editor.new_file(&mut dialogs));

    assert!(matches!(
        &dialogs.prompts()[0],
        Prompt::Confirm { message, .. } if message == DISCARD_PROMPT
    ));
    assert!(editor.buffer().is_empty());
    assert!(!editor.is_file_modified());
}

#[test]
fn open_file_declined_is_a_noop() {
    let dir = tempdir().unwrap();
    let other = dir.path().join("other.txt");
    fs::write(&other, "other").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new()
        .answer_confirm(false)
        .answer_open(Some(other));
    type_text(&mut editor, &mut dialogs, "keep me");

    assert!(!editor.open_file(&mut dialogs).unwrap());

    assert_eq!(editor.buffer().text(), "keep me");
    assert_eq!(editor.document().file_path, dir.path().join("untitled"));
    assert!(!dialogs.prompts().contains(&Prompt::OpenPath));
}

#[test]
fn open_file_loads_content_clean_with_marker() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "line one\nline two\n").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_open(Some(path.clone()));

    assert!(editor.open_file(&mut dialogs).unwrap());

    assert_eq!(editor.buffer().text(), "line one\nline two\n");
    assert_eq!(editor.document().original_text, "line one\nline two\n");
    assert_eq!(
        editor.document().display_name,
        format!("{}*", path.display())
    );
    assert_eq!(editor.document().file_path, path);
    assert!(!editor.buffer().is_modified());
    assert!(!editor.is_file_modified());
}

#[test]
fn cancelled_open_empties_buffer_but_keeps_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new()
        .answer_open(Some(path.clone()))
        .answer_open(None);
    editor.open_file(&mut dialogs).unwrap();
    let before = editor.document().clone();

    assert!(!editor.open_file(&mut dialogs).unwrap());

    assert_eq!(editor.buffer().text(), "");
    assert!(!editor.buffer().is_modified());
    assert_eq!(editor.document(), &before);
    assert!(dialogs.errors().is_empty());
}

#[test]
fn open_failure_resets_to_untitled() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_open(Some(dir.path().join("missing.txt")));

    let err = editor.open_file(&mut dialogs).unwrap_err();

    assert!(matches!(err, EditorError::FileRead { .. }));
    assert_eq!(dialogs.errors(), vec![OPEN_FAILED]);
    assert_eq!(editor.document(), &DocumentState::untitled(dir.path()));
    assert!(editor.buffer().is_empty());
    assert!(!editor.buffer().is_modified());
    assert_eq!(dialogs.title(), Some("untitled* - SimEdit"));
}

#[test]
fn save_strips_marker_and_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    editor.open_path(&path, &mut dialogs).unwrap();
    editor.dispatch(Command::CursorFileEnd, &mut dialogs).unwrap();
    type_text(&mut editor, &mut dialogs, " world");

    editor.save(&mut dialogs).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    assert_eq!(editor.document().display_name, path.display().to_string());
    assert_eq!(editor.document().original_text, "hello world");
    assert!(!editor.is_file_modified());
    assert_eq!(
        dialogs.title(),
        Some(format!("{} - SimEdit", path.display()).as_str())
    );
}

#[test]
fn save_then_can_save_is_true() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "v1").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    editor.open_path(&path, &mut dialogs).unwrap();
    type_text(&mut editor, &mut dialogs, "x");

    editor.save(&mut dialogs).unwrap();

    assert!(editor.can_save(&mut dialogs));
    assert!(dialogs.errors().is_empty());
}

#[test]
fn edit_after_save_reattaches_marker() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "v1").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    editor.open_path(&path, &mut dialogs).unwrap();
    editor.save(&mut dialogs).unwrap();
    assert!(!editor.is_file_modified());

    type_text(&mut editor, &mut dialogs, "z");

    assert!(editor.is_file_modified());
    assert!(editor.document().display_name.ends_with('*'));
}

#[test]
fn can_save_when_file_missing() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    assert!(editor.can_save(&mut dialogs));
}

#[test]
fn save_untitled_writes_placeholder_path() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    type_text(&mut editor, &mut dialogs, "scratch");

    editor.save(&mut dialogs).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("untitled")).unwrap(),
        "scratch"
    );
    assert_eq!(editor.document().display_name, "untitled");
}

#[test]
fn conflict_blocks_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello").unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    editor.open_path(&path, &mut dialogs).unwrap();
    fs::write(&path, "world").unwrap();

    let err = editor.save(&mut dialogs).unwrap_err();

    assert!(matches!(err, EditorError::ExternalConflict { .. }));
    assert_eq!(dialogs.errors(), vec![EXTERNAL_CONFLICT]);
    assert_eq!(fs::read_to_string(&path).unwrap(), "world");
    assert!(editor.document().display_name.ends_with('*'));
}

#[test]
fn save_as_renames_to_base_name() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("a.txt");
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_save(Some(target.clone()));
    type_text(&mut editor, &mut dialogs, "hello");

    assert!(editor.save_as(&mut dialogs).unwrap());

    assert_eq!(editor.title(), "a.txt - SimEdit");
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
    assert_eq!(editor.document().file_path, target);
    assert!(!editor.is_file_modified());
}

#[test]
fn save_as_prompts_even_when_clean() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new().answer_save(None);

    assert!(!editor.save_as(&mut dialogs).unwrap());

    assert_eq!(dialogs.prompts(), &[Prompt::SavePath]);
    assert_eq!(editor.document(), &DocumentState::untitled(dir.path()));
}

#[test]
fn write_failure_leaves_state_untouched() {
    let dir = tempdir().unwrap();
    let mut editor = EditorController::with_provider(
        dir.path().to_path_buf(),
        EditorOptions::default(),
        Box::new(ReadOnlyDisk),
    );
    let mut dialogs = ScriptedDialogs::new().answer_save(Some(PathBuf::from("/ro/b.txt")));
    type_text(&mut editor, &mut dialogs, "data");
    let before = editor.document().clone();

    assert!(matches!(
        editor.save(&mut dialogs),
        Err(EditorError::FileWrite { .. })
    ));
    assert!(matches!(
        editor.save_as(&mut dialogs),
        Err(EditorError::FileWrite { .. })
    ));

    assert_eq!(editor.document(), &before);
    assert!(editor.is_file_modified());
    assert!(dialogs.errors().is_empty());
}

#[test]
fn exit_returns_exit_flow() {
    let dir = tempdir().unwrap();
    let mut editor = controller(&dir);
    let mut dialogs = ScriptedDialogs::new();
    type_text(&mut editor, &mut dialogs, "unsaved");

    assert_eq!(
        editor.dispatch(Command::Exit, &mut dialogs).unwrap(),
        Flow::Exit
    );
    assert_eq!(dialogs.confirm_count(), 0);
}

#[test]
fn exit_can_be_gated_by_settings() {
    let dir = tempdir().unwrap();
    let options = EditorOptions {
        confirm_exit: true,
        ..EditorOptions::default()
    };
    let mut editor = EditorController::new(dir.path().to_path_buf(), options);
    let mut dialogs = ScriptedDialogs::new()
        .answer_confirm(false)
        .answer_confirm(true);
    type_text(&mut editor, &mut dialogs, "unsaved");

    assert_eq!(
        editor.dispatch(Command::Exit, &mut dialogs).unwrap(),
        Flow::Continue
    );
    assert_eq!(
        editor.dispatch(Command::Exit, &mut dialogs).unwrap(),
        Flow::Exit
    );
}

#[test]
fn confirm_exit_skips_prompt_for_clean_document() {
    let dir = tempdir().unwrap();
    let options = EditorOptions {
        confirm_exit: true,
        ..EditorOptions::default()
    };
    let mut editor = EditorController::new(dir.path().to_path_buf(), options);
    let mut dialogs = ScriptedDialogs::new();

    assert_eq!(
        editor.dispatch(Command::Exit, &mut dialogs).unwrap(),
        Flow::Exit
    );
    assert_eq!(dialogs.confirm_count(), 0);
}

#[test]
fn discard_writes_backup_when_enabled() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let options = EditorOptions {
        backup_dir: Some(backups.clone()),
        ..EditorOptions::default()
    };
    let mut editor = EditorController::new(dir.path().to_path_buf(), options);
    let mut dialogs = ScriptedDialogs::new().answer_confirm(true);
    type_text(&mut editor, &mut dialogs, "precious");

    assert!(editor.new_file(&mut dialogs));

    let entries: Vec<_> = fs::read_dir(&backups).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let backup = entries[0].as_ref().unwrap().path();
    assert_eq!(fs::read_to_string(backup).unwrap(), "precious");
}

#[test]
fn options_from_settings_respect_backup_switch() {
    let mut settings = Settings::default();
    settings.backup_on_discard = false;
    let options = EditorOptions::from_settings(&settings, Some(PathBuf::from("/b")));
    assert_eq!(options.backup_dir, None);

    settings.backup_on_discard = true;
    settings.editor.tab_size = 2;
    let options = EditorOptions::from_settings(&settings, Some(PathBuf::from("/b")));
    assert_eq!(options.backup_dir, Some(PathBuf::from("/b")));
    assert_eq!(options.tab_size, 2);
}

#[test]
fn tab_uses_configured_width() {
    let dir = tempdir().unwrap();
    let options = EditorOptions {
        tab_size: 2,
        ..EditorOptions::default()
    };
    let mut editor = EditorController::new(dir.path().to_path_buf(), options);
    let mut dialogs = ScriptedDialogs::new();

    editor.dispatch(Command::InsertTab, &mut dialogs).unwrap();

    assert_eq!(editor.buffer().text(), "  ");
}
