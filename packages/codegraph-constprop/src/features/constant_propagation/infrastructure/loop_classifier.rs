//! Loop classification via strongly connected components
//!
//! Every block of the CFG is assigned a `LoopId`. Blocks that sit in the
//! same SCC of two or more blocks share a nonzero id; everything else,
//! including a single block that branches to itself, keeps id 0.
//!
//! Tarjan's algorithm runs on an explicit frame stack so deep CFGs cannot
//! overflow the native stack. Index, lowlink and on-stack flags live in side
//! tables indexed by `BlockId`.
//!
//! # References
//! - Tarjan, R. "Depth-First Search and Linear Graph Algorithms" (1972)

use std::cmp::min;

use crate::features::constant_propagation::domain::LoopId;
use crate::shared::models::{BlockId, ControlFlowGraph};

/// Result of loop classification for one CFG
#[derive(Debug, Clone, Default)]
pub struct LoopClassifier {
    /// Loop id per block, indexed by `BlockId`
    loop_ids: Vec<LoopId>,

    /// Blocks that list themselves as a successor
    self_loops: Vec<bool>,

    /// Number of nonzero ids handed out
    loop_count: u32,
}

struct Frame {
    block: BlockId,
    next_successor: usize,
}

struct TarjanState {
    index: Vec<Option<u32>>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    stack: Vec<BlockId>,
    current_index: u32,
}

impl TarjanState {
    fn new(blocks: usize) -> Self {
        Self {
            index: vec![None; blocks],
            lowlink: vec![0; blocks],
            on_stack: vec![false; blocks],
            stack: Vec::new(),
            current_index: 0,
        }
    }

    fn discover(&mut self, block: BlockId) {
        let i = block.index();
        self.index[i] = Some(self.current_index);
        self.lowlink[i] = self.current_index;
        self.current_index += 1;
        self.stack.push(block);
        self.on_stack[i] = true;
    }
}

impl LoopClassifier {
    /// Classify every block of `cfg`
    ///
    /// DFS roots are the entry block first, then every block still unvisited
    /// in id order, so unreachable code is classified as well.
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        let n = cfg.blocks.len();
        let mut classifier = Self {
            loop_ids: vec![LoopId::NONE; n],
            self_loops: cfg
                .blocks
                .iter()
                .map(|b| b.live_successors().any(|s| s == b.id))
                .collect(),
            loop_count: 0,
        };

        let mut state = TarjanState::new(n);
        let roots = cfg
            .entry
            .into_iter()
            .chain(cfg.blocks.iter().map(|b| b.id));

        for root in roots {
            if root.index() >= n || state.index[root.index()].is_some() {
                continue;
            }
            classifier.strong_connect(cfg, root, &mut state);
        }

        classifier
    }

    fn strong_connect(&mut self, cfg: &ControlFlowGraph, root: BlockId, state: &mut TarjanState) {
        let n = cfg.blocks.len();
        let mut frames = vec![Frame {
            block: root,
            next_successor: 0,
        }];
        state.discover(root);

        while let Some(frame) = frames.last_mut() {
            let v = frame.block;
            let successors = &cfg.blocks[v.index()].successors;

            if frame.next_successor < successors.len() {
                let successor = successors[frame.next_successor];
                frame.next_successor += 1;

                // Null successors are statically unreachable edges
                let Some(w) = successor else { continue };
                if w.index() >= n {
                    continue;
                }

                match state.index[w.index()] {
                    None => {
                        state.discover(w);
                        frames.push(Frame {
                            block: w,
                            next_successor: 0,
                        });
                    }
                    Some(w_index) if state.on_stack[w.index()] => {
                        state.lowlink[v.index()] = min(state.lowlink[v.index()], w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            frames.pop();
            if let Some(parent) = frames.last() {
                let p = parent.block.index();
                state.lowlink[p] = min(state.lowlink[p], state.lowlink[v.index()]);
            }

            if Some(state.lowlink[v.index()]) == state.index[v.index()] {
                self.close_component(v, state);
            }
        }
    }

    /// Pop the component rooted at `root`; components of 2+ blocks get the next id
    fn close_component(&mut self, root: BlockId, state: &mut TarjanState) {
        let mut members = Vec::new();
        while let Some(w) = state.stack.pop() {
            state.on_stack[w.index()] = false;
            members.push(w);
            if w == root {
                break;
            }
        }

        if members.len() > 1 {
            self.loop_count += 1;
            let id = LoopId(self.loop_count);
            for member in members {
                self.loop_ids[member.index()] = id;
            }
        }
    }

    /// Loop containing `block`, `LoopId::NONE` if none or unknown
    pub fn loop_id(&self, block: BlockId) -> LoopId {
        self.loop_ids
            .get(block.index())
            .copied()
            .unwrap_or(LoopId::NONE)
    }

    /// `true` if both blocks belong to the same tracked loop
    pub fn same_loop(&self, a: BlockId, b: BlockId) -> bool {
        let id = self.loop_id(a);
        id.is_loop() && id == self.loop_id(b)
    }

    /// Single block branching to itself (its loop id stays 0)
    pub fn has_self_loop(&self, block: BlockId) -> bool {
        self.self_loops.get(block.index()).copied().unwrap_or(false)
    }

    pub fn loop_count(&self) -> usize {
        self.loop_count as usize
    }

    pub fn block_count(&self) -> usize {
        self.loop_ids.len()
    }

    /// Blocks of `loop_id` in id order
    pub fn members(&self, loop_id: LoopId) -> Vec<BlockId> {
        if !loop_id.is_loop() {
            return Vec::new();
        }
        self.loop_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| **id == loop_id)
            .map(|(i, _)| BlockId(i as u32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::CfgBuilder;

    fn graph(blocks: u32, edges: &[(u32, u32)]) -> ControlFlowGraph {
        let mut builder = CfgBuilder::new("test");
        for _ in 0..blocks {
            builder.add_block(vec![]);
        }
        for &(from, to) in edges {
            builder.add_edge(BlockId(from), BlockId(to));
        }
        builder.build()
    }

    #[test]
    fn test_acyclic_graph_has_no_loops() {
        // Diamond: 0 -> {1, 2} -> 3
        let cfg = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_count(), 0);
        for i in 0..4 {
            assert_eq!(loops.loop_id(BlockId(i)), LoopId::NONE);
        }
        assert!(!loops.same_loop(BlockId(1), BlockId(1)));
    }

    #[test]
    fn test_simple_loop() {
        // 0 -> 1 (header) -> 2 (body) -> 1, 1 -> 3 (exit)
        let cfg = graph(4, &[(0, 1), (1, 2), (2, 1), (1, 3)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_count(), 1);
        assert_eq!(loops.loop_id(BlockId(1)), LoopId(1));
        assert_eq!(loops.loop_id(BlockId(2)), LoopId(1));
        assert_eq!(loops.loop_id(BlockId(0)), LoopId::NONE);
        assert_eq!(loops.loop_id(BlockId(3)), LoopId::NONE);
        assert!(loops.same_loop(BlockId(1), BlockId(2)));
        assert!(!loops.same_loop(BlockId(0), BlockId(1)));
        assert_eq!(loops.members(LoopId(1)), vec![BlockId(1), BlockId(2)]);
    }

    #[test]
    fn test_two_sequential_loops_get_distinct_ids() {
        // 0 -> 1 <-> 2, 1 -> 3 <-> 4, 3 -> 5
        let cfg = graph(6, &[(0, 1), (1, 2), (2, 1), (1, 3), (3, 4), (4, 3), (3, 5)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_count(), 2);
        let first = loops.loop_id(BlockId(1));
        let second = loops.loop_id(BlockId(3));
        assert!(first.is_loop());
        assert!(second.is_loop());
        assert_ne!(first, second);
        assert!(!loops.same_loop(BlockId(2), BlockId(4)));
    }

    #[test]
    fn test_ids_follow_component_closing_order() {
        // The inner-most finished component closes first: 3 <-> 4 is found
        // before 1 <-> 2 because DFS reaches it through 1 and finishes it first.
        let cfg = graph(5, &[(0, 1), (1, 3), (3, 4), (4, 3), (1, 2), (2, 1)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_id(BlockId(3)), LoopId(1));
        assert_eq!(loops.loop_id(BlockId(1)), LoopId(2));
    }

    #[test]
    fn test_nested_loops_share_one_component() {
        // outer: 1 -> 2 -> 3 -> 2 (inner), 3 -> 1 (outer latch), 1 -> 4
        let cfg = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 2), (3, 1), (1, 4)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_count(), 1);
        assert!(loops.same_loop(BlockId(1), BlockId(3)));
        assert!(loops.same_loop(BlockId(2), BlockId(3)));
    }

    #[test]
    fn test_self_loop_keeps_id_zero() {
        let cfg = graph(3, &[(0, 1), (1, 1), (1, 2)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_count(), 0);
        assert_eq!(loops.loop_id(BlockId(1)), LoopId::NONE);
        assert!(loops.has_self_loop(BlockId(1)));
        assert!(!loops.has_self_loop(BlockId(0)));
    }

    #[test]
    fn test_unreachable_edges_break_cycles() {
        let mut builder = CfgBuilder::new("test");
        let b0 = builder.add_block(vec![]);
        let b1 = builder.add_block(vec![]);
        builder.add_edge(b0, b1).add_unreachable_edge(b1, b0);
        let loops = LoopClassifier::new(&builder.build());

        assert_eq!(loops.loop_count(), 0);
    }

    #[test]
    fn test_unreachable_blocks_are_classified() {
        // 2 <-> 3 is not reachable from the entry
        let cfg = graph(4, &[(0, 1), (2, 3), (3, 2)]);
        let loops = LoopClassifier::new(&cfg);

        assert_eq!(loops.loop_count(), 1);
        assert!(loops.same_loop(BlockId(2), BlockId(3)));
    }

    #[test]
    fn test_empty_graph() {
        let loops = LoopClassifier::new(&ControlFlowGraph::empty("f"));
        assert_eq!(loops.block_count(), 0);
        assert_eq!(loops.loop_id(BlockId(0)), LoopId::NONE);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let n = 200_000u32;
        let edges: Vec<(u32, u32)> = (0..n - 1).map(|i| (i, i + 1)).chain([(n - 1, 0)]).collect();
        let loops = LoopClassifier::new(&graph(n, &edges));

        assert_eq!(loops.loop_count(), 1);
        assert!(loops.same_loop(BlockId(0), BlockId(n - 1)));
    }
}
