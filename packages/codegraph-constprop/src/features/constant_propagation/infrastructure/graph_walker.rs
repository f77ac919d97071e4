//! Graph Walker
//!
//! Drives one function through the analysis:
//! 1. Classify blocks into loops (Tarjan SCC)
//! 2. Loop-scan pre-pass: which variables does each loop assign?
//! 3. Main pass in reverse post-order from the entry
//!    - carry the single predecessor's state forward, or merge several
//!    - predecessors reached over a back edge are not waited for; their
//!      target starts with the loop's assignments Unresolved
//!    - leaving a loop forces everything it assigns to Unresolved
//! 4. Squash the history once
//!
//! Loops are treated as running zero or one times. There is no fixpoint
//! iteration; the loop-closing invalidation is what keeps results sound.

use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::config::PropagationConfig;
use crate::features::constant_propagation::domain::{BlockState, LoopId, PropagationResult};
use crate::features::constant_propagation::ports::ValueKind;
use crate::shared::models::{BasicBlock, BlockId, ControlFlowGraph};

use super::block_pass::BlockDataflowPass;
use super::loop_classifier::LoopClassifier;
use super::mutation_tracker::MutationTracker;
use super::value_history::ValueHistory;

/// Everything kept about one analyzed function
#[derive(Debug, Clone)]
pub struct FunctionAnalysis<T: Ord> {
    pub function_id: String,
    pub history: ValueHistory<T>,
    pub loops: LoopClassifier,
    pub mutations: MutationTracker,
    pub block_count: usize,
}

pub struct GraphWalker<'a, K: ValueKind> {
    kind: &'a K,
    config: &'a PropagationConfig,
}

impl<'a, K: ValueKind> GraphWalker<'a, K> {
    pub fn new(kind: &'a K, config: &'a PropagationConfig) -> Self {
        Self { kind, config }
    }

    pub fn run(&self, cfg: &ControlFlowGraph) -> FunctionAnalysis<K::Value> {
        let loops = LoopClassifier::new(cfg);
        let mutations = self.scan_loops(cfg, &loops);
        debug!(
            "Loop scan for {} ({}): {} blocks, {} loops",
            cfg.function_id,
            self.kind.kind_name(),
            cfg.len(),
            loops.loop_count()
        );

        let pass = BlockDataflowPass::new(self.kind);
        let mut history = ValueHistory::new();
        let mut end_states: Vec<Option<BlockState<K::Value>>> = vec![None; cfg.len()];

        for id in block_order(cfg) {
            let Some(block) = cfg.block(id) else {
                continue;
            };
            let start = self.entry_state(block, &loops, &mutations, &end_states);
            trace!("{}: entering with {} variables", id, start.len());

            let end = pass.run(block, start, &mut history);
            end_states[id.index()] = Some(end);
        }

        if self.config.squash_history {
            let before = history.len();
            history.squash();
            debug!(
                "Squashed history of {}: {} -> {} entries",
                cfg.function_id,
                before,
                history.len()
            );
        }

        FunctionAnalysis {
            function_id: cfg.function_id.clone(),
            history,
            loops,
            mutations,
            block_count: cfg.len(),
        }
    }

    fn scan_loops(&self, cfg: &ControlFlowGraph, loops: &LoopClassifier) -> MutationTracker {
        let pass = BlockDataflowPass::new(self.kind);
        let mut mutations = MutationTracker::new();

        for block in &cfg.blocks {
            let loop_id = loops.loop_id(block.id);
            let self_loop = self.config.invalidate_self_loops && loops.has_self_loop(block.id);
            if !loop_id.is_loop() && !self_loop {
                continue;
            }

            pass.scan(block, |name| {
                mutations.record(loop_id, name);
                if self_loop {
                    mutations.record_self_loop(block.id, name);
                }
            });
        }

        mutations
    }

    /// Starting state of `block` from its already processed predecessors
    ///
    /// A block that is entered again from inside its own loop (the target of
    /// a back edge) may see any value the loop assigns on a later iteration,
    /// so everything the loop changes starts out Unresolved there. Blocks
    /// further down the loop inherit that from it.
    fn entry_state(
        &self,
        block: &BasicBlock,
        loops: &LoopClassifier,
        mutations: &MutationTracker,
        end_states: &[Option<BlockState<K::Value>>],
    ) -> BlockState<K::Value> {
        let own_loop = loops.loop_id(block.id);
        let mut reentered = false;
        let mut incoming: Vec<&BlockState<K::Value>> = Vec::new();

        for pred in block.live_predecessors().filter(|pred| *pred != block.id) {
            match end_states.get(pred.index()).and_then(Option::as_ref) {
                Some(state) => incoming.push(state),
                // Unprocessed predecessors are only reachable over a back edge
                None => reentered |= loops.same_loop(pred, block.id),
            }
        }

        let mut state = match incoming.as_slice() {
            [] => BlockState::new(),
            [single] => (*single).clone(),
            many => merge_states(many),
        };

        if reentered {
            trace!("{}: back edge target, invalidating {}", block.id, own_loop);
            invalidate(&mut state, mutations.changed_in(own_loop));
        }

        let exited: BTreeSet<LoopId> = block
            .live_predecessors()
            .map(|pred| loops.loop_id(pred))
            .filter(|pred_loop| pred_loop.is_loop() && *pred_loop != own_loop)
            .collect();
        for loop_id in exited {
            invalidate(&mut state, mutations.changed_in(loop_id));
        }

        if self.config.invalidate_self_loops && loops.has_self_loop(block.id) {
            invalidate(&mut state, mutations.changed_in_self_loop(block.id));
        }

        state
    }
}

/// Confluence merge
///
/// A variable keeps its value only if every predecessor agrees on it.
/// Disagreement, or absence from any predecessor, gives Unresolved. A value
/// present on only some paths is deliberately not kept: the other paths
/// reach the block with whatever the variable held before, which need not
/// match.
pub fn merge_states<T: Clone + PartialEq>(states: &[&BlockState<T>]) -> BlockState<T> {
    let names: BTreeSet<&String> = states.iter().flat_map(|state| state.keys()).collect();

    names
        .into_iter()
        .map(|name| {
            let mut values = states.iter().map(|state| state.get(name));
            let value = match values.next().flatten() {
                Some(first) if values.all(|other| other == Some(first)) => first.clone(),
                _ => PropagationResult::Unresolved,
            };
            (name.clone(), value)
        })
        .collect()
}

fn invalidate<T>(state: &mut BlockState<T>, names: Option<&BTreeSet<String>>) {
    for name in names.into_iter().flatten() {
        state.insert(name.clone(), PropagationResult::Unresolved);
    }
}

/// Reverse post-order of an iterative DFS from the entry, followed by the
/// blocks the entry cannot reach in id order
pub fn block_order(cfg: &ControlFlowGraph) -> Vec<BlockId> {
    let n = cfg.len();
    let mut visited = vec![false; n];
    let mut postorder = Vec::with_capacity(n);

    if let Some(entry) = cfg.entry.filter(|entry| entry.index() < n) {
        visited[entry.index()] = true;
        let mut stack: Vec<(BlockId, usize)> = vec![(entry, 0)];

        while let Some(frame) = stack.last_mut() {
            let (block, next) = *frame;
            let successors = cfg
                .block(block)
                .map(|b| b.successors.as_slice())
                .unwrap_or(&[]);

            if next < successors.len() {
                frame.1 += 1;
                if let Some(succ) = successors[next] {
                    if succ.index() < n && !visited[succ.index()] {
                        visited[succ.index()] = true;
                        stack.push((succ, 0));
                    }
                }
            } else {
                postorder.push(block);
                stack.pop();
            }
        }
    }

    let mut order: Vec<BlockId> = postorder.into_iter().rev().collect();
    order.extend(
        (0..n)
            .filter(|i| !visited[*i])
            .map(|i| BlockId(i as u32)),
    );
    order
}
