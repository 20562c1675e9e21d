//! Persisted painter document and its version-gated gateway.
//!
//! # Responsibility
//! - Encode the whole painter state as one JSON document under one key.
//! - Refuse documents from any other schema version.
//!
//! # Invariants
//! - `schemaVersion` is checked before the rest of the document is decoded.
//! - Decoded documents satisfy every model invariant or are reported as
//!   `Corrupt`.
//! - `save` overwrites the full document; nothing is batched.

use crate::model::emoji::EmojiDictionary;
use crate::model::favorites::Favorites;
use crate::model::field::Field;
use crate::model::selection::Selection;
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// JSON field carrying the document's schema version.
pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

/// Everything the painter restores at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    pub schema_version: u32,
    pub width: usize,
    pub height: usize,
    pub field: Field,
    pub images: EmojiDictionary,
    pub selection: Selection,
    #[serde(default)]
    pub favorites: Favorites,
}

impl PersistedDocument {
    fn check_dimensions(&self) -> Result<(), String> {
        if self.field.width() != self.width || self.field.height() != self.height {
            return Err(format!(
                "declared size {}x{} does not match field {}x{}",
                self.width,
                self.height,
                self.field.width(),
                self.field.height()
            ));
        }
        Ok(())
    }
}

/// Failures while loading or saving the document.
#[derive(Debug)]
pub enum PersistError {
    Repo(RepoError),
    /// Stored document was written under another (or no) schema version.
    ///
    /// `found` keeps the raw JSON integer, which may exceed `u32`.
    SchemaMismatch { found: Option<u64>, expected: u32 },
    /// Stored bytes are not a valid document.
    Corrupt(String),
    /// Document could not be encoded.
    Encode(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::SchemaMismatch {
                found: Some(found),
                expected,
            } => write!(
                f,
                "persisted schema version {found} does not match expected {expected}"
            ),
            Self::SchemaMismatch {
                found: None,
                expected,
            } => write!(
                f,
                "persisted document has no schema version, expected {expected}"
            ),
            Self::Corrupt(message) => write!(f, "persisted document is corrupt: {message}"),
            Self::Encode(message) => write!(f, "failed to encode document: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Reads and writes the painter document through a key-value repository.
pub struct PersistenceGateway<R: KeyValueRepository> {
    repo: R,
    key: String,
    schema_version: u32,
}

impl<R: KeyValueRepository> PersistenceGateway<R> {
    pub fn new(repo: R, key: impl Into<String>, schema_version: u32) -> Self {
        Self {
            repo,
            key: key.into(),
            schema_version,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Loads the stored document, if one exists.
    ///
    /// # Errors
    /// - `SchemaMismatch` when the stored version differs from this gateway's.
    /// - `Corrupt` when the stored value does not decode or validate.
    /// - `Repo` on storage failure.
    pub fn load(&self) -> Result<Option<PersistedDocument>, PersistError> {
        let Some(raw) = self.repo.get_value(&self.key)? else {
            return Ok(None);
        };

        let value: Value =
            serde_json::from_str(&raw).map_err(|err| PersistError::Corrupt(err.to_string()))?;
        let found = value.get(SCHEMA_VERSION_FIELD).and_then(Value::as_u64);
        if found != Some(u64::from(self.schema_version)) {
            return Err(PersistError::SchemaMismatch {
                found,
                expected: self.schema_version,
            });
        }

        let document: PersistedDocument =
            serde_json::from_value(value).map_err(|err| PersistError::Corrupt(err.to_string()))?;
        document.check_dimensions().map_err(PersistError::Corrupt)?;
        Ok(Some(document))
    }

    /// Overwrites the stored document.
    pub fn save(&self, document: &PersistedDocument) -> Result<(), PersistError> {
        let encoded =
            serde_json::to_string(document).map_err(|err| PersistError::Encode(err.to_string()))?;
        self.repo.put_value(&self.key, &encoded)?;
        Ok(())
    }

    /// Removes the stored document; returns whether one existed.
    pub fn clear(&self) -> Result<bool, PersistError> {
        Ok(self.repo.delete_value(&self.key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistError, PersistedDocument, PersistenceGateway};
    use crate::db::open_db_in_memory;
    use crate::model::emoji::{EmojiDictionary, EmojiEntry};
    use crate::model::favorites::Favorites;
    use crate::model::field::Field;
    use crate::model::selection::Selection;
    use crate::repo::kv_repo::{KeyValueRepository, SqliteKeyValueRepository};
    use serde_json::json;

    fn gateway(version: u32) -> PersistenceGateway<SqliteKeyValueRepository> {
        let repo = SqliteKeyValueRepository::new(open_db_in_memory().unwrap());
        PersistenceGateway::new(repo, "store", version)
    }

    fn document(version: u32) -> PersistedDocument {
        PersistedDocument {
            schema_version: version,
            width: 2,
            height: 1,
            field: Field::new(2, 1, ":a:").unwrap(),
            images: EmojiDictionary::from_entries(vec![EmojiEntry::new(
                ":a:",
                "https://cdn.example.com/a.png",
            )])
            .unwrap(),
            selection: Selection::new(":a:", ":a:"),
            favorites: Favorites::new(),
        }
    }

    #[test]
    fn missing_document_loads_as_none() {
        assert!(gateway(2).load().unwrap().is_none());
    }

    #[test]
    fn saved_document_uses_external_field_names() {
        let gateway = gateway(2);
        gateway.save(&document(2)).unwrap();

        let raw = gateway.repo().get_value("store").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schemaVersion"], json!(2));
        assert_eq!(value["field"], json!([[":a:", ":a:"]]));
        assert_eq!(value["selection"], json!({"fg": ":a:", "bg": ":a:"}));
        assert_eq!(
            value["images"],
            json!([{"name": ":a:", "src": "https://cdn.example.com/a.png"}])
        );

        assert_eq!(gateway.load().unwrap(), Some(document(2)));
    }

    #[test]
    fn older_version_is_a_schema_mismatch() {
        let gateway = gateway(2);
        gateway.save(&document(1)).unwrap();
        let err = gateway.load().unwrap_err();
        assert!(matches!(
            err,
            PersistError::SchemaMismatch {
                found: Some(1),
                expected: 2
            }
        ));
    }

    #[test]
    fn version_beyond_u32_is_reported_as_found() {
        let gateway = gateway(2);
        gateway
            .repo()
            .put_value("store", r#"{"schemaVersion": 4294967298}"#)
            .unwrap();
        assert!(matches!(
            gateway.load().unwrap_err(),
            PersistError::SchemaMismatch {
                found: Some(4_294_967_298),
                expected: 2
            }
        ));
    }

    #[test]
    fn missing_version_is_a_schema_mismatch() {
        let gateway = gateway(2);
        gateway.repo().put_value("store", r#"{"width": 1}"#).unwrap();
        assert!(matches!(
            gateway.load().unwrap_err(),
            PersistError::SchemaMismatch { found: None, .. }
        ));
    }

    #[test]
    fn invalid_payloads_are_corrupt() {
        let gateway = gateway(2);

        gateway.repo().put_value("store", "not json").unwrap();
        assert!(matches!(gateway.load().unwrap_err(), PersistError::Corrupt(_)));

        let mut jagged = serde_json::to_value(document(2)).unwrap();
        jagged["field"] = json!([[":a:", ":a:"], [":a:"]]);
        gateway
            .repo()
            .put_value("store", &jagged.to_string())
            .unwrap();
        assert!(matches!(gateway.load().unwrap_err(), PersistError::Corrupt(_)));

        let mut mismatched = serde_json::to_value(document(2)).unwrap();
        mismatched["width"] = json!(5);
        gateway
            .repo()
            .put_value("store", &mismatched.to_string())
            .unwrap();
        assert!(matches!(gateway.load().unwrap_err(), PersistError::Corrupt(_)));
    }

    #[test]
    fn clear_removes_document() {
        let gateway = gateway(2);
        gateway.save(&document(2)).unwrap();
        assert!(gateway.clear().unwrap());
        assert!(gateway.load().unwrap().is_none());
    }
}
