//! Per-variable value history
//!
//! Append entries while walking the CFG, squash once, then answer point
//! lookups: "what was the last thing known about `name` strictly before
//! this location?"
//!
//! ```text
//! v1:  3:5 '0' (ChangedByCode)
//!      4:5 '1' (ChangedByCode)
//!      5:1 '1' (ControlFlowMerge)   <- dropped by squash, repeats 4:5
//!      7:3 '<UNRESOLVED>' (ChangedByCode)
//! ```

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::features::constant_propagation::domain::{HistoryEntry, PropagationResult, Provenance};
use crate::shared::models::SourceLocation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValueHistory<T: Ord> {
    entries: BTreeMap<String, BTreeSet<HistoryEntry<T>>>,
}

impl<T: Ord> Default for ValueHistory<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone> ValueHistory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; an identical (location, provenance, value) triple is
    /// stored once.
    pub fn record(
        &mut self,
        name: &str,
        value: PropagationResult<T>,
        location: SourceLocation,
        provenance: Provenance,
    ) {
        let entry = HistoryEntry::new(location, provenance, value);
        match self.entries.get_mut(name) {
            Some(set) => {
                set.insert(entry);
            }
            None => {
                self.entries
                    .insert(name.to_string(), BTreeSet::from([entry]));
            }
        }
    }

    /// Drop redundant and superseded entries
    ///
    /// Walks each variable's entries in order with `i` the pending entry and
    /// `j` the candidate:
    /// - same value: `j` is a repeat and is dropped;
    /// - different value, different location: `i` is kept;
    /// - different value, same location: `j` replaces `i` (a statement entry
    ///   overrides the block-entry merge entry at its position). If the last
    ///   kept entry already holds `j`'s value, `j` adds nothing and that
    ///   entry becomes pending again.
    ///
    /// Every lookup answers the same before and after, and squashing twice
    /// changes nothing.
    pub fn squash(&mut self) {
        for set in self.entries.values_mut() {
            *set = squash_entries(std::mem::take(set));
        }
    }

    /// Value recorded by the latest entry strictly before `location`
    ///
    /// `None` means the analysis has no opinion; `Some(Unresolved)` means it
    /// determined the value is not constant.
    pub fn lookup(&self, name: &str, location: SourceLocation) -> Option<PropagationResult<T>> {
        self.entries
            .get(name)?
            .iter()
            .rev()
            .find(|entry| entry.location.is_before(&location))
            .map(|entry| entry.value.clone())
    }

    /// Tracked variable names in order
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries of `name` in location order
    pub fn entries(&self, name: &str) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.get(name).into_iter().flatten()
    }

    /// Total number of entries across all variables
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn squash_entries<T: Ord>(entries: BTreeSet<HistoryEntry<T>>) -> BTreeSet<HistoryEntry<T>> {
    let mut kept: Vec<HistoryEntry<T>> = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter();
    let Some(mut pending) = iter.next() else {
        return BTreeSet::new();
    };

    for candidate in iter {
        if candidate.value == pending.value {
            continue;
        }

        if candidate.location != pending.location {
            kept.push(std::mem::replace(&mut pending, candidate));
            continue;
        }

        pending = candidate;
        if let Some(last) = kept.last() {
            if last.value == pending.value {
                if let Some(previous) = kept.pop() {
                    pending = previous;
                }
            }
        }
    }

    kept.push(pending);
    kept.into_iter().collect()
}
