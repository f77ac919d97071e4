//! Control Flow Graph types
//!
//! Blocks live in an arena indexed by `BlockId`. The graph is produced by the
//! CFG builder collaborator and is only ever borrowed by the analysis.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::Statement;

/// Stable block identity, equal to the block's index in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// CFG basic block
///
/// `None` entries in the adjacency lists are edges the builder proved
/// statically unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub statements: Vec<Statement>,
    pub predecessors: Vec<Option<BlockId>>,
    pub successors: Vec<Option<BlockId>>,
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            statements: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        }
    }

    /// Reachable predecessors
    pub fn live_predecessors(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.predecessors.iter().flatten().copied()
    }

    /// Reachable successors
    pub fn live_successors(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.successors.iter().flatten().copied()
    }
}

/// Structural problems in a CFG handed to the analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfgError {
    #[error("block at index {index} carries id {id}")]
    BlockIdMismatch { index: usize, id: BlockId },

    #[error("entry block {0} does not exist")]
    MissingEntry(BlockId),

    #[error("graph has blocks but no entry block")]
    NoEntry,

    #[error("edge {from} -> {to} points outside the graph")]
    DanglingEdge { from: BlockId, to: BlockId },
}

/// Control flow graph of one function body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub function_id: String,
    pub entry: Option<BlockId>,
    pub blocks: Vec<BasicBlock>,
}

impl ControlFlowGraph {
    pub fn empty(function_id: impl Into<String>) -> Self {
        Self {
            function_id: function_id.into(),
            entry: None,
            blocks: Vec::new(),
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.blocks.iter().map(|b| b.live_successors().count()).sum()
    }

    pub fn statement_count(&self) -> usize {
        self.blocks.iter().map(|b| b.statements.len()).sum()
    }

    /// Check arena indices, entry and edge targets
    pub fn validate(&self) -> Result<(), CfgError> {
        for (index, block) in self.blocks.iter().enumerate() {
            if block.id.index() != index {
                return Err(CfgError::BlockIdMismatch {
                    index,
                    id: block.id,
                });
            }
        }

        match self.entry {
            Some(entry) if self.block(entry).is_none() => return Err(CfgError::MissingEntry(entry)),
            None if !self.blocks.is_empty() => return Err(CfgError::NoEntry),
            _ => {}
        }

        for block in &self.blocks {
            let edges = block
                .live_successors()
                .map(|to| (block.id, to))
                .chain(block.live_predecessors().map(|from| (from, block.id)));
            for (from, to) in edges {
                if self.block(from).is_none() || self.block(to).is_none() {
                    return Err(CfgError::DanglingEdge { from, to });
                }
            }
        }

        Ok(())
    }
}

/// Incremental CFG construction with symmetric edges
///
/// The first block added is the entry unless `set_entry` says otherwise.
#[derive(Debug)]
pub struct CfgBuilder {
    graph: ControlFlowGraph,
}

impl CfgBuilder {
    pub fn new(function_id: impl Into<String>) -> Self {
        Self {
            graph: ControlFlowGraph::empty(function_id),
        }
    }

    /// Append a block holding `statements` and return its id
    pub fn add_block(&mut self, statements: Vec<Statement>) -> BlockId {
        let id = BlockId(self.graph.blocks.len() as u32);
        let mut block = BasicBlock::new(id);
        block.statements = statements;
        self.graph.blocks.push(block);
        if self.graph.entry.is_none() {
            self.graph.entry = Some(id);
        }
        id
    }

    pub fn set_entry(&mut self, entry: BlockId) -> &mut Self {
        self.graph.entry = Some(entry);
        self
    }

    /// Connect `from -> to`. Ids must come from `add_block`.
    pub fn add_edge(&mut self, from: BlockId, to: BlockId) -> &mut Self {
        if let Some(block) = self.graph.blocks.get_mut(from.index()) {
            block.successors.push(Some(to));
        }
        if let Some(block) = self.graph.blocks.get_mut(to.index()) {
            block.predecessors.push(Some(from));
        }
        self
    }

    /// Record an edge the builder proved can never be taken
    pub fn add_unreachable_edge(&mut self, from: BlockId, to: BlockId) -> &mut Self {
        if let Some(block) = self.graph.blocks.get_mut(from.index()) {
            block.successors.push(None);
        }
        if let Some(block) = self.graph.blocks.get_mut(to.index()) {
            block.predecessors.push(None);
        }
        self
    }

    pub fn build(self) -> ControlFlowGraph {
        self.graph
    }
}
