//! Pointer-driven painting.

pub mod controller;
