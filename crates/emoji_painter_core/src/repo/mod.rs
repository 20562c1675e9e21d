//! Storage-facing repositories.
//!
//! # Responsibility
//! - Keep SQL behind a key-value contract.
//! - Encode, version-gate and validate the persisted painter document.
//!
//! # Invariants
//! - Writes replace the whole value under a key; there are no partial writes.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod document_repo;
pub mod kv_repo;
