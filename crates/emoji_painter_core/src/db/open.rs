//! Connection bootstrap for file and in-memory databases.
//!
//! # Invariants
//! - Returned connections have every storage migration applied.

use super::migrations::{apply_migrations, latest_version};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the painter database at `path`.
///
/// # Side effects
/// - Applies pending storage migrations.
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    bootstrap("file", || Connection::open(path))
}

/// Opens an existing painter database without writing to it.
///
/// Fails when the file is missing or its storage schema is not exactly the
/// latest one; migrations are never applied.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    bootstrap_with("read_only", || {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        ensure_latest_schema(&conn)?;
        Ok(conn)
    })
}

/// Opens a throwaway in-memory database with the full storage schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

fn bootstrap(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    bootstrap_with(mode, || {
        let mut conn = connect()?;
        configure(&mut conn)?;
        Ok(conn)
    })
}

fn bootstrap_with(
    mode: &'static str,
    connect: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect();

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn configure(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}

fn ensure_latest_schema(conn: &Connection) -> DbResult<()> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current < latest {
        return Err(DbError::OutdatedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    Ok(())
}
