//! Flutter-facing bridge for the emoji painter core.

pub mod api;
