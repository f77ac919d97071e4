//! Shared module - Common types
//!
//! Models produced by the CFG builder collaborator and consumed by the
//! analysis features.

pub mod models;

pub use models::*;
