//! Text dump of a function's value history
//!
//! ```text
//! ==== main ====
//!   * v1
//!     - 3:5 '0' (ChangedByCode)
//!     - 7:3 '<UNRESOLVED>' (ChangedByCode)
//! ```
//!
//! Variables appear in name order, entries in location order. Tests parse
//! this format back, so it must stay stable.
//!
//! Values are written with `char::escape_default`, so every entry stays on
//! one line and a quote inside a value cannot end it early. A value that
//! would read as the unresolved marker gets a leading backslash.

use std::fmt;

use crate::features::constant_propagation::domain::UNRESOLVED_MARKER;
use crate::features::constant_propagation::ports::ValueKind;

use super::value_history::ValueHistory;

pub struct HistoryDump<'a, K: ValueKind> {
    kind: &'a K,
    function_id: &'a str,
    history: &'a ValueHistory<K::Value>,
}

impl<'a, K: ValueKind> HistoryDump<'a, K> {
    pub fn new(kind: &'a K, function_id: &'a str, history: &'a ValueHistory<K::Value>) -> Self {
        Self {
            kind,
            function_id,
            history,
        }
    }
}

impl<K: ValueKind> fmt::Display for HistoryDump<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==== {} ====", self.function_id)?;
        for name in self.history.variables() {
            writeln!(f, "  * {}", name)?;
            for entry in self.history.entries(name) {
                let value = match entry.value.resolved() {
                    Some(value) => escape_value(&self.kind.format_value(value)),
                    None => UNRESOLVED_MARKER.to_string(),
                };
                writeln!(
                    f,
                    "    - {} '{}' ({})",
                    entry.location, value, entry.provenance
                )?;
            }
        }
        Ok(())
    }
}

fn escape_value(value: &str) -> String {
    let escaped = value.escape_default().to_string();
    if escaped == UNRESOLVED_MARKER {
        format!("\\{}", escaped)
    } else {
        escaped
    }
}
