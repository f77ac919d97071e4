//! Dump parsing and history assertions
//!
//! `parse_dump` reads the text dump back line by line; it is the oracle for
//! round-trip tests. Values come back unescaped, with the unresolved marker
//! turned into `PropagationResult::Unresolved`.

use codegraph_constprop::features::constant_propagation::{
    PropagationResult, Provenance, ValueHistory, ValueKind, UNRESOLVED_MARKER,
};
use codegraph_constprop::shared::models::SourceLocation;

/// One `- <location> '<value>' (<provenance>)` line, with its context
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DumpRecord {
    pub function_id: String,
    pub variable: String,
    pub location: SourceLocation,
    pub value: PropagationResult<String>,
    pub provenance: Provenance,
}

/// Parse dump text; panics on any line outside the format
pub fn parse_dump(text: &str) -> Vec<DumpRecord> {
    let mut records = Vec::new();
    let mut function_id: Option<String> = None;
    let mut variable: Option<String> = None;

    for line in text.lines() {
        if let Some(banner) = line
            .strip_prefix("==== ")
            .and_then(|rest| rest.strip_suffix(" ===="))
        {
            function_id = Some(banner.to_string());
            variable = None;
        } else if let Some(name) = line.strip_prefix("  * ") {
            variable = Some(name.to_string());
        } else if let Some(entry) = line.strip_prefix("    - ") {
            let (location, rest) = entry.split_once(" '").expect("location");
            let (value, rest) = rest.rsplit_once("' (").expect("value");
            let provenance = rest.strip_suffix(')').expect("provenance");

            records.push(DumpRecord {
                function_id: function_id.clone().expect("banner before entries"),
                variable: variable.clone().expect("variable before entries"),
                location: location.parse().expect("location format"),
                value: parse_value(value),
                provenance: Provenance::from_str(provenance).expect("provenance name"),
            });
        } else {
            panic!("unexpected dump line: {:?}", line);
        }
    }

    records
}

fn parse_value(raw: &str) -> PropagationResult<String> {
    if raw == UNRESOLVED_MARKER {
        PropagationResult::Unresolved
    } else {
        PropagationResult::Resolved(unescape(raw))
    }
}

/// Undo `char::escape_default` and the marker escape
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next().expect("escape sequence") {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'u' => {
                let code: String = chars.by_ref().skip(1).take_while(|c| *c != '}').collect();
                let decoded = u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .expect("unicode escape");
                out.push(decoded);
            }
            other => out.push(other),
        }
    }

    out
}

/// The records a faithful dump of `history` must contain
pub fn history_records<K: ValueKind>(
    kind: &K,
    function_id: &str,
    history: &ValueHistory<K::Value>,
) -> Vec<DumpRecord> {
    let mut records = Vec::new();
    for variable in history.variables() {
        for entry in history.entries(variable) {
            records.push(DumpRecord {
                function_id: function_id.to_string(),
                variable: variable.to_string(),
                location: entry.location,
                value: match &entry.value {
                    PropagationResult::Resolved(value) => {
                        PropagationResult::Resolved(kind.format_value(value))
                    }
                    PropagationResult::Unresolved => PropagationResult::Unresolved,
                },
                provenance: entry.provenance,
            });
        }
    }
    records
}

#[track_caller]
pub fn assert_resolved<T: PartialEq + std::fmt::Debug>(
    actual: Option<PropagationResult<T>>,
    expected: T,
) {
    assert_eq!(actual, Some(PropagationResult::Resolved(expected)));
}

#[track_caller]
pub fn assert_unresolved<T: PartialEq + std::fmt::Debug>(actual: Option<PropagationResult<T>>) {
    assert_eq!(actual, Some(PropagationResult::Unresolved));
}
