//! FFI use-case API for the Flutter painter host.
//!
//! # Responsibility
//! - Expose painter operations as sync, never-panicking functions via FRB.
//! - Own the one live painter session of the host process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The session is opened lazily on first use and shared by every call.
//! - The host suppresses the context menu; this layer only forwards buttons.

use emoji_painter_core::db::open_db;
use emoji_painter_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BrushSlot, PainterConfig, PainterSession, PointerButton, SessionResult,
    SqliteKeyValueRepository,
};
use log::error;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const PAINTER_DB_FILE_NAME: &str = "emoji_painter.sqlite3";
const PAINTER_DB_PATH_ENV: &str = "EMOJI_PAINTER_DB_PATH";

type HostSession = PainterSession<SqliteKeyValueRepository>;

static PAINTER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<HostSession>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for painter actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PainterActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl PainterActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Render-ready view of the painter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PainterSnapshot {
    pub width: u32,
    pub height: u32,
    /// Row-major cell names; `""` means unset.
    pub rows: Vec<Vec<String>>,
    pub foreground: String,
    pub background: String,
    pub favorites: Vec<String>,
}

/// One row of the emoji list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PainterEmojiItem {
    pub name: String,
    pub image_ref: String,
    pub is_favorite: bool,
}

/// Returns the current painter state, opening the session if needed.
///
/// Returns `None` when the session cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_snapshot() -> Option<PainterSnapshot> {
    let guard = lock_session("painter_snapshot").ok()?;
    let session = guard.as_ref()?;
    let field = session.field();
    Some(PainterSnapshot {
        width: to_u32(field.width()),
        height: to_u32(field.height()),
        rows: field.rows().to_vec(),
        foreground: session.selection().foreground.clone(),
        background: session.selection().background.clone(),
        favorites: session.favorites().names().to_vec(),
    })
}

/// Forwards a pointer press on cell `(row, col)`.
///
/// `button` is the DOM `MouseEvent.button` code.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_pointer_down(button: u8, row: u32, col: u32) -> PainterActionResponse {
    run_action("painter_pointer_down", |session| {
        let painted = session.pointer_down(
            PointerButton::from_dom_button(button),
            row as usize,
            col as usize,
        )?;
        let message = if painted { "Painted." } else { "Ignored." };
        Ok(message.to_string())
    })
}

/// Forwards the pointer entering cell `(row, col)`.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_pointer_over(row: u32, col: u32) -> PainterActionResponse {
    run_action("painter_pointer_over", |session| {
        let painted = session.pointer_over(row as usize, col as usize)?;
        let message = if painted { "Painted." } else { "Ignored." };
        Ok(message.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn painter_pointer_up() -> PainterActionResponse {
    run_action("painter_pointer_up", |session| {
        session.pointer_up();
        Ok("Gesture ended.".to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn painter_pointer_leave() -> PainterActionResponse {
    run_action("painter_pointer_leave", |session| {
        session.pointer_leave_canvas();
        Ok("Gesture cancelled.".to_string())
    })
}

/// Changes field width and/or height; `None` keeps the current value.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_resize(width: Option<u32>, height: Option<u32>) -> PainterActionResponse {
    run_action("painter_resize", |session| {
        session.resize(width.map(|w| w as usize), height.map(|h| h as usize))?;
        let field = session.field();
        Ok(format!("Field is {}x{}.", field.width(), field.height()))
    })
}

/// Replaces the emoji dictionary with the content of an import file.
///
/// A rejected file leaves the painter untouched and reports why.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_import_emojis(json_text: String) -> PainterActionResponse {
    run_action("painter_import_emojis", |session| {
        let imported = session.import_dictionary_json(&json_text)?;
        Ok(format!("Loaded {imported} emoji(s)."))
    })
}

/// Sets a brush from the emoji list; `slot` is `fg` or `bg`.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_set_brush(slot: String, name: String) -> PainterActionResponse {
    let slot = match slot.trim() {
        "fg" | "foreground" => BrushSlot::Foreground,
        "bg" | "background" => BrushSlot::Background,
        other => {
            return PainterActionResponse::failure(format!(
                "painter_set_brush failed: unknown slot `{other}`; expected fg|bg"
            ))
        }
    };
    run_action("painter_set_brush", |session| {
        session.set_brush(slot, &name)?;
        Ok("Brush set.".to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn painter_swap_brushes() -> PainterActionResponse {
    run_action("painter_swap_brushes", |session| {
        session.swap_brushes()?;
        Ok("Brushes swapped.".to_string())
    })
}

/// Fills the whole field with the background brush.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_clear() -> PainterActionResponse {
    run_action("painter_clear", |session| {
        session.clear_with_background()?;
        Ok("Field cleared.".to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn painter_reset() -> PainterActionResponse {
    run_action("painter_reset", |session| {
        session.reset()?;
        Ok("Painter reset.".to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn painter_toggle_favorite(name: String) -> PainterActionResponse {
    run_action("painter_toggle_favorite", |session| {
        let message = if session.toggle_favorite(&name)? {
            "Added to favorites."
        } else {
            "Removed from favorites."
        };
        Ok(message.to_string())
    })
}

/// Returns clipboard text for the field, or an empty string on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn painter_export_text() -> String {
    match lock_session("painter_export_text") {
        Ok(guard) => guard
            .as_ref()
            .map(|session| session.export_text())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}

/// Lists emojis whose name contains `query` (case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn painter_search(query: String) -> Vec<PainterEmojiItem> {
    let Ok(guard) = lock_session("painter_search") else {
        return Vec::new();
    };
    let Some(session) = guard.as_ref() else {
        return Vec::new();
    };
    session
        .search(&query)
        .into_iter()
        .map(|entry| PainterEmojiItem {
            name: entry.name.clone(),
            image_ref: entry.image_ref.clone(),
            is_favorite: session.favorites().contains(&entry.name),
        })
        .collect()
}

/// Image for a cell or brush name; `None` means "missing image".
#[flutter_rust_bridge::frb(sync)]
pub fn painter_image_for(name: String) -> Option<String> {
    let guard = lock_session("painter_image_for").ok()?;
    guard
        .as_ref()?
        .image_for(&name)
        .map(ToString::to_string)
}

fn run_action(
    operation: &'static str,
    f: impl FnOnce(&mut HostSession) -> SessionResult<String>,
) -> PainterActionResponse {
    let mut guard = match lock_session(operation) {
        Ok(guard) => guard,
        Err(message) => return PainterActionResponse::failure(message),
    };
    let Some(session) = guard.as_mut() else {
        return PainterActionResponse::failure(format!("{operation} failed: no session"));
    };
    match f(session) {
        Ok(message) => PainterActionResponse::success(message),
        Err(err) => PainterActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

/// Locks the shared session, opening it on first use.
fn lock_session(
    operation: &'static str,
) -> Result<MutexGuard<'static, Option<HostSession>>, String> {
    let mut guard = SESSION.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.is_none() {
        let db_path = resolve_painter_db_path();
        let conn = open_db(&db_path).map_err(|err| {
            error!("event=ffi_session_open module=ffi status=error operation={operation} error={err}");
            format!("{operation} failed: painter DB open failed: {err}")
        })?;
        let repo = SqliteKeyValueRepository::new(conn);
        let session = PainterSession::open(repo, PainterConfig::default())
            .map_err(|err| format!("{operation} failed: painter session open failed: {err}"))?;
        *guard = Some(session);
    }
    Ok(guard)
}

fn resolve_painter_db_path() -> PathBuf {
    PAINTER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(PAINTER_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PAINTER_DB_FILE_NAME)
        })
        .clone()
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
