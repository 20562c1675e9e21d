//! Painter session: the single owner of all painter state.
//!
//! # Responsibility
//! - Restore state at startup, falling back to built-in defaults.
//! - Route every user action to the model and re-derive dependent state
//!   (brush repair, favorites pruning) before anyone can observe it.
//! - Write the full document through to storage after every mutation.
//!
//! # Invariants
//! - A rejected dictionary import changes nothing: dictionary, selection,
//!   favorites and field stay as they were.
//! - Brushes are repaired on every dictionary replacement.
//! - New cells created by a resize follow the configured growth policy.
//! - When a write-through fails, the in-memory change is kept and the
//!   storage error is returned.

use crate::config::PainterConfig;
use crate::model::emoji::{DictionaryValidationError, EmojiDictionary, EmojiEntry};
use crate::model::favorites::Favorites;
use crate::model::field::{Field, FieldError};
use crate::model::selection::{BrushSlot, Selection};
use crate::paint::controller::{PaintController, PaintState, PointerButton};
use crate::repo::document_repo::{PersistError, PersistedDocument, PersistenceGateway};
use crate::repo::kv_repo::KeyValueRepository;
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LOGGED_ERROR_CHARS: usize = 160;

/// Where the session's initial state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupSource {
    /// Nothing was stored yet.
    Defaults,
    /// Stored document was loaded.
    Restored,
    /// Stored document had another schema version and was discarded.
    DiscardedSchemaMismatch,
    /// Stored document failed to decode or validate and was discarded.
    DiscardedCorrupt,
}

/// Errors surfaced by session operations.
#[derive(Debug)]
pub enum SessionError {
    /// Import document rejected; state unchanged.
    Dictionary(DictionaryValidationError),
    /// Bad cell address or dimensions from the host.
    Field(FieldError),
    /// Storage failure.
    Persist(PersistError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dictionary(err) => write!(f, "{err}"),
            Self::Field(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Dictionary(err) => Some(err),
            Self::Field(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<DictionaryValidationError> for SessionError {
    fn from(value: DictionaryValidationError) -> Self {
        Self::Dictionary(value)
    }
}

impl From<FieldError> for SessionError {
    fn from(value: FieldError) -> Self {
        Self::Field(value)
    }
}

impl From<PersistError> for SessionError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Live painter state bound to one storage key.
pub struct PainterSession<R: KeyValueRepository> {
    config: PainterConfig,
    gateway: PersistenceGateway<R>,
    dictionary: EmojiDictionary,
    field: Field,
    selection: Selection,
    favorites: Favorites,
    painter: PaintController,
    startup_source: StartupSource,
}

struct PainterState {
    dictionary: EmojiDictionary,
    field: Field,
    selection: Selection,
    favorites: Favorites,
}

impl PainterState {
    fn defaults(config: &PainterConfig) -> SessionResult<Self> {
        let dictionary = EmojiDictionary::from_entries(config.seed_emojis.clone())?;
        let mut selection = Selection::default();
        selection.repair(&dictionary);
        let field = Field::new(
            config.default_width,
            config.default_height,
            &selection.background,
        )?;
        Ok(Self {
            dictionary,
            field,
            selection,
            favorites: Favorites::new(),
        })
    }

    fn from_document(document: PersistedDocument) -> Self {
        Self {
            dictionary: document.images,
            field: document.field,
            selection: document.selection,
            favorites: document.favorites,
        }
    }
}

impl<R: KeyValueRepository> PainterSession<R> {
    /// Opens a session over `repo`, restoring the stored document if it is
    /// usable and persisting the resulting state.
    ///
    /// # Errors
    /// - Storage failures while reading or writing.
    /// - An invalid seed dictionary or default size in `config`.
    pub fn open(repo: R, config: PainterConfig) -> SessionResult<Self> {
        let gateway =
            PersistenceGateway::new(repo, config.storage_key.clone(), config.schema_version);

        let (state, startup_source) = match gateway.load() {
            Ok(Some(document)) => (PainterState::from_document(document), StartupSource::Restored),
            Ok(None) => (PainterState::defaults(&config)?, StartupSource::Defaults),
            Err(PersistError::SchemaMismatch { found, expected }) => {
                warn!(
                    "event=document_load module=service status=fallback reason=schema_mismatch found={} expected={}",
                    found.map_or_else(|| "none".to_string(), |v| v.to_string()),
                    expected
                );
                (
                    PainterState::defaults(&config)?,
                    StartupSource::DiscardedSchemaMismatch,
                )
            }
            Err(PersistError::Corrupt(message)) => {
                warn!(
                    "event=document_load module=service status=fallback reason=corrupt error={}",
                    crate::logging::single_line(&message, LOGGED_ERROR_CHARS)
                );
                (
                    PainterState::defaults(&config)?,
                    StartupSource::DiscardedCorrupt,
                )
            }
            Err(other) => return Err(other.into()),
        };

        let mut session = Self {
            config,
            gateway,
            dictionary: state.dictionary,
            field: state.field,
            selection: state.selection,
            favorites: state.favorites,
            painter: PaintController::new(),
            startup_source,
        };
        session.reconcile_with_dictionary();
        session.persist()?;

        info!(
            "event=session_open module=service status=ok source={:?} width={} height={} emojis={}",
            session.startup_source,
            session.field.width(),
            session.field.height(),
            session.dictionary.len()
        );
        Ok(session)
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn startup_source(&self) -> StartupSource {
        self.startup_source
    }

    pub fn dictionary(&self) -> &EmojiDictionary {
        &self.dictionary
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn paint_state(&self) -> PaintState {
        self.painter.state()
    }

    pub fn gateway(&self) -> &PersistenceGateway<R> {
        &self.gateway
    }

    /// Snapshot of the state as it is persisted.
    pub fn document(&self) -> PersistedDocument {
        PersistedDocument {
            schema_version: self.gateway.schema_version(),
            width: self.field.width(),
            height: self.field.height(),
            field: self.field.clone(),
            images: self.dictionary.clone(),
            selection: self.selection.clone(),
            favorites: self.favorites.clone(),
        }
    }

    /// Changes width and/or height; new cells follow the growth policy.
    ///
    /// Returns whether the size changed.
    pub fn resize(&mut self, width: Option<usize>, height: Option<usize>) -> SessionResult<bool> {
        let changed = self.field.resize(
            width,
            height,
            self.config.growth_policy,
            &self.selection.background,
        )?;
        if !changed {
            return Ok(false);
        }
        info!(
            "event=field_resize module=service status=ok width={} height={}",
            self.field.width(),
            self.field.height()
        );
        self.persist()?;
        Ok(true)
    }

    pub fn set_width(&mut self, width: usize) -> SessionResult<bool> {
        self.resize(Some(width), None)
    }

    pub fn set_height(&mut self, height: usize) -> SessionResult<bool> {
        self.resize(None, Some(height))
    }

    /// Replaces the dictionary from an already-parsed import document.
    ///
    /// Returns the number of imported entries.
    pub fn import_dictionary(&mut self, candidate: &Value) -> SessionResult<usize> {
        let dictionary = EmojiDictionary::replace(candidate).map_err(reject_import)?;
        self.apply_dictionary(dictionary)
    }

    /// Replaces the dictionary from import file text.
    pub fn import_dictionary_json(&mut self, text: &str) -> SessionResult<usize> {
        let dictionary = EmojiDictionary::from_json_str(text).map_err(reject_import)?;
        self.apply_dictionary(dictionary)
    }

    fn apply_dictionary(&mut self, dictionary: EmojiDictionary) -> SessionResult<usize> {
        let imported = dictionary.len();
        self.dictionary = dictionary;
        self.reconcile_with_dictionary();
        info!(
            "event=dictionary_import module=service status=ok emojis={} fg_set={} bg_set={}",
            imported,
            !self.selection.foreground.is_empty(),
            !self.selection.background.is_empty()
        );
        self.persist()?;
        Ok(imported)
    }

    fn reconcile_with_dictionary(&mut self) {
        if self.selection.repair(&self.dictionary) {
            debug!("event=selection_repair module=service status=ok");
        }
        let dropped = self.favorites.prune(&self.dictionary);
        if dropped > 0 {
            debug!("event=favorites_prune module=service status=ok dropped={dropped}");
        }
    }

    /// Picks a brush from the emoji list; the name is not validated.
    pub fn set_brush(&mut self, slot: BrushSlot, name: &str) -> SessionResult<()> {
        self.selection.set(slot, name);
        self.persist()
    }

    pub fn swap_brushes(&mut self) -> SessionResult<()> {
        self.selection.swap();
        self.persist()
    }

    /// Returns whether a cell was painted.
    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        row: usize,
        col: usize,
    ) -> SessionResult<bool> {
        let painted =
            self.painter
                .pointer_down(button, row, col, &mut self.field, &self.selection)?;
        if painted {
            self.persist()?;
        }
        Ok(painted)
    }

    /// Returns whether a cell was painted.
    pub fn pointer_over(&mut self, row: usize, col: usize) -> SessionResult<bool> {
        let painted = self
            .painter
            .pointer_over(row, col, &mut self.field, &self.selection)?;
        if painted {
            self.persist()?;
        }
        Ok(painted)
    }

    pub fn pointer_up(&mut self) {
        self.painter.pointer_up();
    }

    pub fn pointer_leave_canvas(&mut self) {
        self.painter.pointer_leave_canvas();
    }

    /// Fills every cell with the current background brush.
    pub fn clear_with_background(&mut self) -> SessionResult<()> {
        let background = self.selection.background.clone();
        self.fill_all(&background)
    }

    pub fn fill_all(&mut self, name: &str) -> SessionResult<()> {
        self.field.fill_all(name);
        self.persist()
    }

    /// Paste-ready text for the whole field.
    pub fn export_text(&self) -> String {
        self.field.as_text()
    }

    /// Returns `true` when `name` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, name: &str) -> SessionResult<bool> {
        let now_favorite = self.favorites.toggle(name);
        self.persist()?;
        Ok(now_favorite)
    }

    pub fn search(&self, query: &str) -> Vec<&EmojiEntry> {
        self.dictionary.search(query)
    }

    /// Image for a cell or brush name; `None` renders as a missing image.
    pub fn image_for(&self, name: &str) -> Option<&str> {
        self.dictionary.image_for(name)
    }

    /// Restores built-in defaults and persists them.
    pub fn reset(&mut self) -> SessionResult<()> {
        let state = PainterState::defaults(&self.config)?;
        self.dictionary = state.dictionary;
        self.field = state.field;
        self.selection = state.selection;
        self.favorites = state.favorites;
        self.painter = PaintController::new();
        info!("event=session_reset module=service status=ok");
        self.persist()
    }

    fn persist(&self) -> SessionResult<()> {
        self.gateway.save(&self.document())?;
        Ok(())
    }
}

fn reject_import(err: DictionaryValidationError) -> SessionError {
    warn!(
        "event=dictionary_import module=service status=rejected error={}",
        crate::logging::single_line(&err.to_string(), LOGGED_ERROR_CHARS)
    );
    SessionError::Dictionary(err)
}
