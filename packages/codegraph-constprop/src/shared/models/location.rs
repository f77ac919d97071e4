//! Source location types
//!
//! Locations are compared by their expansion-normalized position:
//! `(line, column)` is where the code ends up after macro expansion, and
//! `expansion_index` orders the tokens a single macro invocation produced.
//! Ordinary code has `expansion_index == 0`, so it sorts before anything the
//! macro at the same position expanded to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single position in source code, totally ordered in execution-relevant
/// source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    /// 1-based token position inside a macro expansion, 0 for ordinary code
    #[serde(default)]
    pub expansion_index: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            expansion_index: 0,
        }
    }

    /// Position of the `index`-th token produced by the macro invoked at
    /// `line:column`.
    pub fn expanded(line: u32, column: u32, index: u32) -> Self {
        Self {
            line,
            column,
            expansion_index: index,
        }
    }

    pub fn is_macro_expansion(&self) -> bool {
        self.expansion_index > 0
    }

    /// `true` if `self` comes strictly before `other`.
    pub fn is_before(&self, other: &SourceLocation) -> bool {
        self < other
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_macro_expansion() {
            write!(f, "{}:{}#{}", self.line, self.column, self.expansion_index)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Error returned when a location string is not `line:column[#index]`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid source location '{0}' (expected line:column or line:column#index)")]
pub struct ParseLocationError(pub String);

impl FromStr for SourceLocation {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLocationError(s.to_string());

        let (position, expansion_index) = match s.split_once('#') {
            Some((position, index)) => (position, index.parse().map_err(|_| err())?),
            None => (s, 0),
        };
        let (line, column) = position.split_once(':').ok_or_else(err)?;

        Ok(Self {
            line: line.parse().map_err(|_| err())?,
            column: column.parse().map_err(|_| err())?,
            expansion_index,
        })
    }
}
