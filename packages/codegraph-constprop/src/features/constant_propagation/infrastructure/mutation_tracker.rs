//! Variables mutated inside each loop
//!
//! Filled by the loop-scan pre-pass before any value is propagated. When
//! control leaves a loop, everything the loop assigns anywhere in its body
//! is forced to Unresolved: the analysis does not iterate loops to a
//! fixpoint, so only values that cannot change across an iteration boundary
//! survive.

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

use crate::features::constant_propagation::domain::LoopId;
use crate::shared::models::BlockId;

#[derive(Debug, Clone, Default)]
pub struct MutationTracker {
    by_loop: FxHashMap<LoopId, BTreeSet<String>>,

    /// Single-block self-loops have no loop id, so they are keyed by block
    by_self_loop: FxHashMap<BlockId, BTreeSet<String>>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `name` is assigned somewhere inside `loop_id`.
    /// Ignored for `LoopId::NONE`.
    pub fn record(&mut self, loop_id: LoopId, name: &str) {
        if !loop_id.is_loop() {
            return;
        }
        self.by_loop
            .entry(loop_id)
            .or_default()
            .insert(name.to_string());
    }

    pub fn record_self_loop(&mut self, block: BlockId, name: &str) {
        self.by_self_loop
            .entry(block)
            .or_default()
            .insert(name.to_string());
    }

    /// Variables assigned anywhere inside `loop_id`
    pub fn changed_in(&self, loop_id: LoopId) -> Option<&BTreeSet<String>> {
        self.by_loop.get(&loop_id)
    }

    /// Variables a self-looping `block` assigns
    pub fn changed_in_self_loop(&self, block: BlockId) -> Option<&BTreeSet<String>> {
        self.by_self_loop.get(&block)
    }

    pub fn is_empty(&self) -> bool {
        self.by_loop.is_empty() && self.by_self_loop.is_empty()
    }
}
