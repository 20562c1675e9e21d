//! Painter domain model.
//!
//! # Responsibility
//! - Define the emoji dictionary, painted field, brush selection and
//!   favorites shared by the engine.
//!
//! # Invariants
//! - Cells and brushes refer to emojis by name only.
//! - Dictionary import is the only path that replaces the dictionary.

pub mod emoji;
pub mod favorites;
pub mod field;
pub mod selection;
