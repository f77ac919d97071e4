//! Propagation Cache
//!
//! Public entry point: answers "what is `variable` at `location` in
//! `function`?" Each function is analyzed once, on its first query, and the
//! squashed history is kept for every later query.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::{PropagationConfig, Validatable};
use crate::features::constant_propagation::domain::PropagationResult;
use crate::features::constant_propagation::infrastructure::{
    AnalysisResult, FunctionAnalysis, GraphWalker, HistoryDump, IntegerKind, PropagationError,
    StringKind,
};
use crate::features::constant_propagation::ports::{CfgSource, ValueKind};
use crate::shared::models::{CallArgument, Expression, SourceLocation};

/// Constant propagation over integral variables
pub type IntegerPropagator<S> = PropagationCache<IntegerKind, S>;

/// Constant propagation over `char *` variables
pub type StringPropagator<S> = PropagationCache<StringKind, S>;

/// Per-function memoization of propagation results
///
/// Responsibilities:
/// - Fetch and validate the CFG on first use of a function
/// - Run the graph walker and keep its history
/// - Answer point queries, dumps and exports
///
/// NOT Responsible For:
/// - Building CFGs (`CfgSource`)
/// - Folding expressions (`ValueKind`)
pub struct PropagationCache<K: ValueKind, S: CfgSource> {
    kind: K,
    source: S,
    config: PropagationConfig,

    /// Ordered by function id so `dump_all` is stable
    analyses: BTreeMap<String, FunctionAnalysis<K::Value>>,
}

impl<K: ValueKind, S: CfgSource> PropagationCache<K, S> {
    pub fn new(kind: K, source: S) -> Self {
        Self::from_parts(kind, source, PropagationConfig::default())
    }

    /// Create with a validated configuration
    pub fn with_config(kind: K, source: S, config: PropagationConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(kind, source, config))
    }

    fn from_parts(kind: K, source: S, config: PropagationConfig) -> Self {
        info!(
            "constant_propagation_initialized (kind={}, cache={})",
            kind.kind_name(),
            config.enable_cache
        );
        Self {
            kind,
            source,
            config,
            analyses: BTreeMap::new(),
        }
    }

    /// Value of `variable` just before `location`
    ///
    /// `Ok(None)` means no opinion: nothing was recorded before `location`,
    /// or the variable is not tracked. Errors only come from the CFG source
    /// or from a CFG the analysis refuses.
    pub fn query(
        &mut self,
        function_id: &str,
        variable: &str,
        location: SourceLocation,
    ) -> AnalysisResult<Option<PropagationResult<K::Value>>> {
        let analysis = self.analyze(function_id)?;
        Ok(analysis.history.lookup(variable, location))
    }

    /// Value passed for `argument` at a call site
    ///
    /// Literal-foldable arguments resolve without touching the CFG. A plain
    /// tracked variable is looked up at the argument's own location.
    pub fn resolve_argument(
        &mut self,
        function_id: &str,
        argument: &CallArgument,
    ) -> AnalysisResult<Option<PropagationResult<K::Value>>> {
        if let Some(value) = self.kind.try_evaluate_constant(&argument.value) {
            return Ok(Some(PropagationResult::Resolved(value)));
        }

        match &argument.value {
            Expression::Variable(variable) if self.kind.is_tracked_type(variable.ty) => {
                self.query(function_id, &variable.name, argument.location)
            }
            _ => Ok(None),
        }
    }

    /// Analyze `function_id` now, or reuse the cached analysis
    pub fn analyze(&mut self, function_id: &str) -> AnalysisResult<&FunctionAnalysis<K::Value>> {
        if self.config.enable_cache && self.analyses.contains_key(function_id) {
            debug!("Constant propagation cache hit: {}", function_id);
        } else {
            let analysis = self.build(function_id)?;
            self.analyses.insert(function_id.to_string(), analysis);
        }

        self.analyses
            .get(function_id)
            .ok_or_else(|| PropagationError::unknown_function(function_id))
    }

    fn build(&self, function_id: &str) -> AnalysisResult<FunctionAnalysis<K::Value>> {
        let cfg = self.source.build_cfg(function_id)?;

        cfg.validate()
            .map_err(|source| PropagationError::InvalidCfg {
                function_id: function_id.to_string(),
                source,
            })?;

        if !self.config.admits(cfg.len()) {
            return Err(PropagationError::BlockLimitExceeded {
                function_id: function_id.to_string(),
                blocks: cfg.len(),
                limit: self.config.max_blocks,
            });
        }

        info!(
            "Propagating {} constants: {} ({} blocks, {} statements)",
            self.kind.kind_name(),
            function_id,
            cfg.len(),
            cfg.statement_count()
        );

        Ok(GraphWalker::new(&self.kind, &self.config).run(&cfg))
    }

    /// Text dump of one function's history, analyzing it if needed
    pub fn dump(&mut self, function_id: &str) -> AnalysisResult<String> {
        self.analyze(function_id)?;
        let analysis = self
            .analyses
            .get(function_id)
            .ok_or_else(|| PropagationError::unknown_function(function_id))?;
        Ok(HistoryDump::new(&self.kind, function_id, &analysis.history).to_string())
    }

    /// Dumps of every analyzed function, in function id order
    pub fn dump_all(&self) -> String {
        self.analyses
            .iter()
            .map(|(function_id, analysis)| {
                HistoryDump::new(&self.kind, function_id, &analysis.history).to_string()
            })
            .collect()
    }

    /// JSON export of one function's history
    pub fn export_json(&mut self, function_id: &str) -> AnalysisResult<String> {
        let kind_name = self.kind.kind_name();
        let analysis = self.analyze(function_id)?;
        let export = serde_json::json!({
            "function_id": function_id,
            "kind": kind_name,
            "blocks": analysis.block_count,
            "loops": analysis.loops.loop_count(),
            "history": &analysis.history,
        });
        Ok(serde_json::to_string_pretty(&export)?)
    }

    pub fn is_cached(&self, function_id: &str) -> bool {
        self.analyses.contains_key(function_id)
    }

    /// Analyzed function ids, sorted
    pub fn cached_functions(&self) -> Vec<&str> {
        self.analyses.keys().map(String::as_str).collect()
    }

    /// Drop every cached analysis
    pub fn clear(&mut self) {
        self.analyses.clear();
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }
}
