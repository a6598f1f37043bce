use super::*;

#[test]
fn untitled_document_uses_placeholder() {
    let doc = DocumentState::untitled(Path::new("/work"));
    assert_eq!(doc.display_name, "untitled*");
    assert_eq!(doc.file_path, PathBuf::from("/work/untitled"));
    assert!(doc.original_text.is_empty());
    assert_eq!(doc.title(), "untitled* - SimEdit");
}

#[test]
fn opened_document_keeps_full_path_with_mark() {
    let doc = DocumentState::opened(Path::new("/tmp/a.txt"), "hello".to_string());
    assert_eq!(doc.display_name, "/tmp/a.txt*");
    assert_eq!(doc.original_text, "hello");
    assert!(doc.has_dirty_mark());
    assert_ne!(doc, DocumentState::untitled(Path::new("/tmp")));
}

#[test]
fn dirty_mark_is_added_once_and_stripped_once() {
    let mut doc = DocumentState::opened(Path::new("/tmp/a.txt"), String::new());
    assert!(!doc.mark_dirty());
    doc.strip_dirty_mark();
    assert_eq!(doc.display_name, "/tmp/a.txt");
    doc.strip_dirty_mark();
    assert_eq!(doc.display_name, "/tmp/a.txt");
    assert!(doc.mark_dirty());
    assert_eq!(doc.display_name, "/tmp/a.txt*");
}

#[test]
fn rename_to_uses_base_name() {
    let mut doc = DocumentState::untitled(Path::new("/work"));
    doc.rename_to(Path::new("/tmp/a.txt"), "hello".to_string());
    assert_eq!(doc.display_name, "a.txt");
    assert_eq!(doc.file_path, PathBuf::from("/tmp/a.txt"));
    assert_eq!(doc.original_text, "hello");
    assert_eq!(doc.title(), "a.txt - SimEdit");
}
