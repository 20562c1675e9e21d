use emoji_painter_core::db::open_db;
use emoji_painter_core::{
    KeyValueRepository, PainterConfig, PainterSession, PointerButton, SqliteKeyValueRepository,
};
use std::path::Path;
use std::process::{Command, Output};

fn run_export(db_path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_emoji_painter_cli"))
        .arg("export")
        .arg(db_path)
        .output()
        .unwrap()
}

fn stored_value(db_path: &Path) -> Option<String> {
    SqliteKeyValueRepository::new(open_db(db_path).unwrap())
        .get_value("store")
        .unwrap()
}

#[test]
fn export_prints_the_stored_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("painter.db");
    {
        let repo = SqliteKeyValueRepository::new(open_db(&path).unwrap());
        let mut session = PainterSession::open(repo, PainterConfig::default()).unwrap();
        session.resize(Some(2), Some(2)).unwrap();
        session
            .pointer_down(PointerButton::Primary, 1, 0)
            .unwrap();
        session.pointer_up();
    }
    let before = stored_value(&path);

    let output = run_export(&path);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        ":12ozmouse-buttermilk::12ozmouse-buttermilk:\n:-satan-::12ozmouse-buttermilk:\n"
    );
    assert_eq!(stored_value(&path), before);
}

#[test]
fn export_of_missing_database_fails_without_creating_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.db");

    let output = run_export(&path);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
    assert!(!path.exists());
}

#[test]
fn export_of_other_schema_version_fails_and_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");
    let old_document = r#"{"schemaVersion":1,"width":1,"height":1,"field":[[":a:"]]}"#;
    SqliteKeyValueRepository::new(open_db(&path).unwrap())
        .put_value("store", old_document)
        .unwrap();

    let output = run_export(&path);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("schema version 1"));
    assert_eq!(stored_value(&path).as_deref(), Some(old_document));
}

#[test]
fn export_of_corrupt_document_fails_and_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    SqliteKeyValueRepository::new(open_db(&path).unwrap())
        .put_value("store", "not json")
        .unwrap();

    let output = run_export(&path);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("corrupt"));
    assert_eq!(stored_value(&path).as_deref(), Some("not json"));
}

#[test]
fn export_of_empty_database_reports_missing_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    drop(open_db(&path).unwrap());

    let output = run_export(&path);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no painter document"));
    assert_eq!(stored_value(&path), None);
}
