//! Pinned emoji names shown ahead of the full list.

use crate::model::emoji::EmojiDictionary;
use serde::{Deserialize, Serialize};

/// Ordered set of favorite emoji names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    names: Vec<String>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    /// Adds `name` at the end, or removes it if already present.
    ///
    /// Returns `true` when `name` is a favorite afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(position) = self.names.iter().position(|existing| existing == name) {
            self.names.remove(position);
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Drops names missing from `dictionary`; returns how many were dropped.
    pub fn prune(&mut self, dictionary: &EmojiDictionary) -> usize {
        let before = self.names.len();
        self.names.retain(|name| dictionary.contains(name));
        before - self.names.len()
    }
}
