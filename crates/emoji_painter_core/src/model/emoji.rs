//! Emoji dictionary model and import validation.
//!
//! # Responsibility
//! - Hold the name -> image reference mapping painted cells point into.
//! - Validate raw import documents (object or array form) as a whole.
//!
//! # Invariants
//! - Every name is a non-empty string and unique within a dictionary.
//! - Every image reference is an absolute `http`/`https` URL.
//! - Insertion order is preserved; it drives fallback brush selection.
//! - A rejected candidate never yields a partial dictionary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").expect("valid image url regex"));

/// One importable emoji: a unique name and the image it renders as.
///
/// Serialized with the import file's array-form field names
/// (`name`, `src`, `date`, `author`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiEntry {
    pub name: String,
    #[serde(rename = "src")]
    pub image_ref: String,
    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    pub authored_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl EmojiEntry {
    /// Creates an entry without author metadata.
    pub fn new(name: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_ref: image_ref.into(),
            authored_date: None,
            author: None,
        }
    }
}

/// Ordered, validated collection of emoji entries keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EmojiEntry>", into = "Vec<EmojiEntry>")]
pub struct EmojiDictionary {
    entries: Vec<EmojiEntry>,
    index: HashMap<String, usize>,
}

impl EmojiDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary from already-structured entries.
    ///
    /// Applies the name/URL/uniqueness rules; author metadata stays optional.
    pub fn from_entries(entries: Vec<EmojiEntry>) -> Result<Self, DictionaryValidationError> {
        let mut dictionary = Self::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if entry.name.is_empty() {
                return Err(DictionaryValidationError::EmptyName { index });
            }
            if !is_image_url(&entry.image_ref) {
                return Err(DictionaryValidationError::InvalidUrl { key: entry.name });
            }
            dictionary.push(entry)?;
        }
        Ok(dictionary)
    }

    /// Validates an import document and returns the dictionary it describes.
    ///
    /// Accepts either an object mapping `name -> url` or an array of
    /// `{ src, name, date, author }` objects. The caller keeps its current
    /// dictionary on `Err`.
    pub fn replace(candidate: &Value) -> Result<Self, DictionaryValidationError> {
        match candidate {
            Value::Object(map) => Self::from_object_form(map),
            Value::Array(items) => Self::from_array_form(items),
            _ => Err(DictionaryValidationError::NotACollection),
        }
    }

    /// Parses import file text and validates it with [`Self::replace`].
    pub fn from_json_str(text: &str) -> Result<Self, DictionaryValidationError> {
        let candidate: Value = serde_json::from_str(text)
            .map_err(|err| DictionaryValidationError::Parse(err.to_string()))?;
        Self::replace(&candidate)
    }

    fn from_object_form(map: &Map<String, Value>) -> Result<Self, DictionaryValidationError> {
        let mut dictionary = Self::new();
        for (index, (key, value)) in map.iter().enumerate() {
            if key.is_empty() {
                return Err(DictionaryValidationError::EmptyName { index });
            }
            let Some(url) = value.as_str() else {
                return Err(DictionaryValidationError::NotAString { key: key.clone() });
            };
            if !is_image_url(url) {
                return Err(DictionaryValidationError::InvalidUrl { key: key.clone() });
            }
            dictionary.push(EmojiEntry::new(key.as_str(), url))?;
        }
        Ok(dictionary)
    }

    fn from_array_form(items: &[Value]) -> Result<Self, DictionaryValidationError> {
        let mut dictionary = Self::new();
        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                return Err(DictionaryValidationError::NotAnObject { index });
            };
            let src = required_text(object, index, "src")?;
            let name = required_text(object, index, "name")?;
            if !is_image_url(src) {
                return Err(DictionaryValidationError::InvalidUrl {
                    key: name.to_string(),
                });
            }
            let date = required_text(object, index, "date")?;
            let author = required_text(object, index, "author")?;

            dictionary.push(EmojiEntry {
                name: name.to_string(),
                image_ref: src.to_string(),
                authored_date: Some(date.to_string()),
                author: Some(author.to_string()),
            })?;
        }
        Ok(dictionary)
    }

    fn push(&mut self, entry: EmojiEntry) -> Result<(), DictionaryValidationError> {
        if self.index.contains_key(entry.name.as_str()) {
            return Err(DictionaryValidationError::DuplicateName(entry.name));
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&EmojiEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// Image reference for `name`, or `None` when the name is dangling.
    pub fn image_for(&self, name: &str) -> Option<&str> {
        self.get(name).map(|entry| entry.image_ref.as_str())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[EmojiEntry] {
        &self.entries
    }

    /// First and second names by insertion order.
    pub fn first_two_keys(&self) -> (Option<&str>, Option<&str>) {
        let mut names = self.entries.iter().map(|entry| entry.name.as_str());
        (names.next(), names.next())
    }

    /// Case-insensitive substring match on names, in insertion order.
    ///
    /// A blank query matches every entry.
    pub fn search(&self, query: &str) -> Vec<&EmojiEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(needle.as_str()))
            .collect()
    }
}

impl TryFrom<Vec<EmojiEntry>> for EmojiDictionary {
    type Error = DictionaryValidationError;

    fn try_from(value: Vec<EmojiEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(value)
    }
}

impl From<EmojiDictionary> for Vec<EmojiEntry> {
    fn from(value: EmojiDictionary) -> Self {
        value.entries
    }
}

/// Returns whether `value` looks like an absolute http(s) URL.
pub fn is_image_url(value: &str) -> bool {
    IMAGE_URL_RE.is_match(value)
}

fn required_text<'a>(
    object: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a str, DictionaryValidationError> {
    match object.get(field).and_then(Value::as_str) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(DictionaryValidationError::MissingField { index, field }),
    }
}

/// Reasons an import document is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryValidationError {
    /// Input is not JSON at all.
    Parse(String),
    /// Top-level value is neither an object nor an array.
    NotACollection,
    /// Array-form item at `index` is not an object.
    NotAnObject { index: usize },
    /// Entry at `index` has an empty name.
    EmptyName { index: usize },
    /// Object-form value for `key` is not a string.
    NotAString { key: String },
    /// Image reference for `key` is not an http(s) URL.
    InvalidUrl { key: String },
    /// Array-form item at `index` lacks a non-empty string `field`.
    MissingField { index: usize, field: &'static str },
    /// Same name appears twice.
    DuplicateName(String),
}

impl Display for DictionaryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "emoji file is not valid JSON: {message}"),
            Self::NotACollection => write!(f, "emoji file must be an object or an array"),
            Self::NotAnObject { index } => write!(f, "emoji entry #{index} is not an object"),
            Self::EmptyName { index } => write!(f, "emoji entry #{index} has an empty name"),
            Self::NotAString { key } => write!(f, "emoji `{key}` image is not a string"),
            Self::InvalidUrl { key } => write!(f, "emoji `{key}` image is not an http(s) URL"),
            Self::MissingField { index, field } => {
                write!(f, "emoji entry #{index} is missing text field `{field}`")
            }
            Self::DuplicateName(name) => write!(f, "emoji name is duplicated: {name}"),
        }
    }
}

impl Error for DictionaryValidationError {}
