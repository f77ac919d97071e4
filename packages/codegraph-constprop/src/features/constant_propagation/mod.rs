//! Constant Propagation
//!
//! Decides, for a variable used at a program location, whether its value is
//! statically known and what it is:
//! - Classify blocks into loops (Tarjan SCC)
//! - Walk the CFG once, merging states at confluence points
//! - Invalidate what a loop assigns when control leaves it
//! - Keep a per-variable history and answer point lookups
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Application Layer                       │
//! │  - PropagationCache (point queries)     │
//! └─────────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │ Infrastructure Layer                    │
//! │  - GraphWalker (ordering, merge)        │
//! │  - BlockDataflowPass (statements)       │
//! │  - LoopClassifier, MutationTracker      │
//! │  - ValueHistory (record/squash/lookup)  │
//! └─────────────────────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │ Domain / Ports                          │
//! │  - PropagationResult, Provenance        │
//! │  - ValueKind, CfgSource                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Performance
//!
//! - **Complexity**: O(blocks + edges + statements) per function
//! - Each function is analyzed once and cached
//!
//! # Example
//!
//! ```rust,ignore
//! use codegraph_constprop::features::constant_propagation::{
//!     InMemoryCfgSource, IntegerKind, PropagationCache,
//! };
//!
//! let mut cache = PropagationCache::new(IntegerKind::new(), InMemoryCfgSource::new().with(cfg));
//! match cache.query("main", "v1", location)? {
//!     Some(PropagationResult::Resolved(value)) => println!("v1 = {}", value),
//!     Some(PropagationResult::Unresolved) => println!("v1 is not constant"),
//!     None => println!("no opinion"),
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{IntegerPropagator, PropagationCache, StringPropagator};

pub use domain::{
    BlockState, HistoryEntry, LoopId, PropagationResult, Provenance, UNRESOLVED_MARKER,
};

pub use ports::{CfgSource, ValueKind};

pub use infrastructure::{
    AnalysisResult, FunctionAnalysis, HistoryDump, InMemoryCfgSource, IntegerKind,
    PropagationError, StringKind, ValueHistory,
};

// Internal building blocks (prefer the cache)
#[doc(hidden)]
pub use infrastructure::{
    BlockDataflowPass, ConstantFolder, GraphWalker, LoopClassifier, MutationTracker,
};
