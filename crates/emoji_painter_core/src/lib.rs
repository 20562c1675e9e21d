//! Core state engine for the emoji painter.
//! This crate is the single source of truth for field, dictionary and brush
//! invariants; hosts only render and forward pointer events.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod paint;
pub mod repo;
pub mod service;

pub use config::{PainterConfig, CURRENT_SCHEMA_VERSION};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::emoji::{DictionaryValidationError, EmojiDictionary, EmojiEntry};
pub use model::favorites::Favorites;
pub use model::field::{Field, FieldError, GrowthPolicy};
pub use model::selection::{BrushSlot, Selection};
pub use paint::controller::{PaintController, PaintState, PointerButton};
pub use repo::document_repo::{PersistError, PersistedDocument, PersistenceGateway};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository};
pub use service::painter_service::{PainterSession, SessionError, SessionResult, StartupSource};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
