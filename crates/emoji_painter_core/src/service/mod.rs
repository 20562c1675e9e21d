//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate model, paint controller and persistence into host-facing
//!   operations.
//! - Keep hosts decoupled from storage details.

pub mod painter_service;
