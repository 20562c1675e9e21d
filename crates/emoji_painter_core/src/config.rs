//! Engine configuration and built-in defaults.
//!
//! # Invariants
//! - `schema_version` is compared for equality only; documents written
//!   under any other version are discarded, never migrated.
//! - The seed dictionary satisfies dictionary validation.

use crate::model::emoji::EmojiEntry;
use crate::model::field::GrowthPolicy;

/// Version stamped into every persisted document.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;
/// Storage key holding the whole document.
pub const DEFAULT_STORAGE_KEY: &str = "store";
pub const DEFAULT_FIELD_WIDTH: usize = 8;
pub const DEFAULT_FIELD_HEIGHT: usize = 4;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PainterConfig {
    pub storage_key: String,
    pub schema_version: u32,
    pub default_width: usize,
    pub default_height: usize,
    pub growth_policy: GrowthPolicy,
    /// Dictionary used on first run, after reset, and after a discarded
    /// document.
    pub seed_emojis: Vec<EmojiEntry>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            schema_version: CURRENT_SCHEMA_VERSION,
            default_width: DEFAULT_FIELD_WIDTH,
            default_height: DEFAULT_FIELD_HEIGHT,
            growth_policy: GrowthPolicy::default(),
            seed_emojis: seed_emojis(),
        }
    }
}

/// The two entries every fresh session starts with.
pub fn seed_emojis() -> Vec<EmojiEntry> {
    vec![
        EmojiEntry::new(
            ":-satan-:",
            "https://emoji.slack-edge.com/T47BK6X1U/-satan-/e40cbb4f8726fae4.jpg",
        ),
        EmojiEntry::new(
            ":12ozmouse-buttermilk:",
            "https://emoji.slack-edge.com/T47BK6X1U/12ozmouse-buttermilk/2e626d7ad2ff12bb.png",
        ),
    ]
}
