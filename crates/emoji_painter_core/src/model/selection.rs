//! Foreground/background brush selection.
//!
//! # Invariants
//! - After [`Selection::repair`], both brushes name dictionary entries, or
//!   are `""` when the dictionary is empty.
//! - `repair` is idempotent.

use crate::model::emoji::EmojiDictionary;
use serde::{Deserialize, Serialize};

/// Which of the two brushes an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushSlot {
    Foreground,
    Background,
}

/// Active brushes, persisted as `{ "fg", "bg" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "fg")]
    pub foreground: String,
    #[serde(rename = "bg")]
    pub background: String,
}

impl Selection {
    pub fn new(foreground: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            foreground: foreground.into(),
            background: background.into(),
        }
    }

    pub fn brush(&self, slot: BrushSlot) -> &str {
        match slot {
            BrushSlot::Foreground => &self.foreground,
            BrushSlot::Background => &self.background,
        }
    }

    /// Assigns a brush verbatim; unknown names render as a missing image.
    pub fn set(&mut self, slot: BrushSlot, name: impl Into<String>) {
        match slot {
            BrushSlot::Foreground => self.foreground = name.into(),
            BrushSlot::Background => self.background = name.into(),
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.foreground, &mut self.background);
    }

    /// Re-points brushes that no longer exist in `dictionary`.
    ///
    /// Foreground falls back to the first entry; background to the second,
    /// or the first when there is only one. Returns whether anything moved.
    pub fn repair(&mut self, dictionary: &EmojiDictionary) -> bool {
        let (first, second) = dictionary.first_two_keys();
        let mut changed = false;

        if !dictionary.contains(&self.foreground) {
            changed |= replace_brush(&mut self.foreground, first.unwrap_or_default());
        }
        if !dictionary.contains(&self.background) {
            let fallback = second.or(first).unwrap_or_default();
            changed |= replace_brush(&mut self.background, fallback);
        }
        changed
    }
}

fn replace_brush(brush: &mut String, name: &str) -> bool {
    if brush == name {
        return false;
    }
    name.clone_into(brush);
    true
}
