/*
 * Codegraph Constprop - CFG Constant Propagation Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : CFG and statement models (BasicBlock, Statement, SourceLocation)
 * - features/    : constant_propagation (loops → walk → history → query)
 * - config/      : Versioned YAML configuration
 *
 * Answers "is this variable constant here, and what is it?" for callers that
 * rewrite call sites. One pass per function, cached.
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models (CFG, statements, locations)
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::PropagationConfig;
pub use errors::{ConstPropError, Result};
pub use features::constant_propagation::{
    CfgSource, InMemoryCfgSource, IntegerKind, IntegerPropagator, PropagationCache,
    PropagationResult, Provenance, StringKind, StringPropagator, ValueKind,
};
pub use shared::models::{CfgBuilder, ControlFlowGraph, SourceLocation};
