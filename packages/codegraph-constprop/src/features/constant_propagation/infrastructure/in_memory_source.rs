//! CFG source over graphs built ahead of time

use rustc_hash::FxHashMap;

use crate::features::constant_propagation::ports::CfgSource;
use crate::shared::models::ControlFlowGraph;

use super::errors::{AnalysisResult, PropagationError};

/// Prebuilt CFGs keyed by function id
#[derive(Debug, Clone, Default)]
pub struct InMemoryCfgSource {
    graphs: FxHashMap<String, ControlFlowGraph>,
}

impl InMemoryCfgSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `cfg` under its own function id, returning any graph it replaces
    pub fn insert(&mut self, cfg: ControlFlowGraph) -> Option<ControlFlowGraph> {
        self.graphs.insert(cfg.function_id.clone(), cfg)
    }

    pub fn with(mut self, cfg: ControlFlowGraph) -> Self {
        self.insert(cfg);
        self
    }

    pub fn contains(&self, function_id: &str) -> bool {
        self.graphs.contains_key(function_id)
    }

    /// Registered function ids, sorted
    pub fn function_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.graphs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl CfgSource for InMemoryCfgSource {
    fn build_cfg(&self, function_id: &str) -> AnalysisResult<ControlFlowGraph> {
        self.graphs
            .get(function_id)
            .cloned()
            .ok_or_else(|| PropagationError::unknown_function(function_id))
    }
}
