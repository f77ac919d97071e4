//! Domain models for constant propagation
//!
//! Pure value types with no knowledge of how a CFG is walked.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::shared::models::SourceLocation;

/// Text used wherever an unresolved value is rendered
pub const UNRESOLVED_MARKER: &str = "<UNRESOLVED>";

/// What the analysis knows about a variable at some point
///
/// Two `Unresolved` values are equal, `Resolved` values compare by payload,
/// and a `Resolved` never equals `Unresolved`. The derived total order puts
/// `Unresolved` first; it only exists so results can live in ordered sets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropagationResult<T> {
    Unresolved,
    Resolved(T),
}

impl<T> PropagationResult<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Unresolved => None,
        }
    }
}

impl<T> From<Option<T>> for PropagationResult<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Resolved(value),
            None => Self::Unresolved,
        }
    }
}

/// Why a history entry exists
///
/// Declaration order matters: at equal locations a `ChangedByCode` entry
/// sorts after (and so supersedes) a `ControlFlowMerge` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Synthesized at block entry from the predecessors' states
    ControlFlowMerge,
    /// Produced by a declaration, assignment or mutating call
    ChangedByCode,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ControlFlowMerge => "ControlFlowMerge",
            Self::ChangedByCode => "ChangedByCode",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ControlFlowMerge" => Some(Self::ControlFlowMerge),
            "ChangedByCode" => Some(Self::ChangedByCode),
            _ => None,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped fact about a variable
///
/// Field order drives the derived ordering: location, then provenance,
/// then value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HistoryEntry<T> {
    pub location: SourceLocation,
    pub provenance: Provenance,
    pub value: PropagationResult<T>,
}

impl<T> HistoryEntry<T> {
    pub fn new(location: SourceLocation, provenance: Provenance, value: PropagationResult<T>) -> Self {
        Self {
            location,
            provenance,
            value,
        }
    }
}

/// Most recently known value per variable at a block boundary
///
/// Copied by value between blocks, never shared.
pub type BlockState<T> = BTreeMap<String, PropagationResult<T>>;

/// Loop identity assigned by the loop classifier; 0 = not in a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LoopId(pub u32);

impl LoopId {
    pub const NONE: LoopId = LoopId(0);

    pub fn is_loop(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}
