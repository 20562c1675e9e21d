use emoji_painter_core::db::migrations::latest_version;
use emoji_painter_core::db::{open_db, open_db_in_memory, open_db_read_only, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn reopening_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("painter.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO kv_store (key, value) VALUES ('store', '{}');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let value: String = second
        .query_row("SELECT value FROM kv_store WHERE key = 'store';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(value, "{}");
}

#[test]
fn newer_storage_schema_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_only_open_does_not_create_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    assert!(matches!(open_db_read_only(&path), Err(DbError::Sqlite(_))));
    assert!(!path.exists());
}

#[test]
fn read_only_open_refuses_unmigrated_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE other (id INTEGER);")
        .unwrap();

    match open_db_read_only(&path).unwrap_err() {
        DbError::OutdatedSchemaVersion { db_version, .. } => assert_eq!(db_version, 0),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(schema_version(&Connection::open(&path).unwrap()), 0);
}

#[test]
fn read_only_open_reads_migrated_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("painter.db");
    drop(open_db(&path).unwrap());

    let conn = open_db_read_only(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(conn
        .execute("INSERT INTO kv_store (key, value) VALUES ('k', 'v');", [])
        .is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
