//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `emoji_painter_core` linkage with deterministic output.
//! - `export <db_path>` prints the persisted field as paste-ready text.
//!
//! # Invariants
//! - `export` never writes: a missing file, an unusable document or another
//!   schema version is an error, not a reason to fall back to defaults.

use emoji_painter_core::config::DEFAULT_STORAGE_KEY;
use emoji_painter_core::db::open_db_read_only;
use emoji_painter_core::{PersistenceGateway, SqliteKeyValueRepository, CURRENT_SCHEMA_VERSION};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            println!("emoji_painter_core ping={}", emoji_painter_core::ping());
            println!(
                "emoji_painter_core version={}",
                emoji_painter_core::core_version()
            );
            ExitCode::SUCCESS
        }
        [command, db_path] if command == "export" => match export(db_path) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("export failed: {err}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: emoji_painter_cli [export <db_path>]");
            ExitCode::from(2)
        }
    }
}

fn export(db_path: &str) -> Result<String, Box<dyn std::error::Error>> {
    if !Path::new(db_path).is_file() {
        return Err(format!("database `{db_path}` does not exist").into());
    }
    let repo = SqliteKeyValueRepository::new(open_db_read_only(db_path)?);
    let gateway = PersistenceGateway::new(repo, DEFAULT_STORAGE_KEY, CURRENT_SCHEMA_VERSION);
    let document = gateway
        .load()?
        .ok_or("no painter document stored in this database")?;
    Ok(document.field.as_text())
}
