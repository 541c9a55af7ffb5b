//! Hop array location inside an untyped topology document.
//!
//! Upstream payloads carry the traversed path under no fixed key or
//! depth. Location runs in two phases: a prioritized list of known key
//! names checked at each map level, then a depth-first scan for the
//! first child sequence that looks hop-shaped. First match wins, so
//! shallower and earlier-declared candidates take precedence and the
//! result is stable for a given document.

use serde_json::Value;

/// Key names that mark a path-shaped sequence, in priority order.
const HOP_KEYS: [&str; 8] = [
    "path",
    "hops",
    "nodes",
    "path_hops",
    "route",
    "pathNodes",
    "segments",
    "flow",
];

/// Locate the most plausible hop sequence in `doc`.
///
/// A sequence under a known key wins even when empty; an unnamed
/// sequence is accepted only when non-empty with a structured first
/// element. Returns `None` when nothing path-shaped exists anywhere,
/// which callers treat as "fall back to scanning", not as an error.
pub fn locate_hops(doc: &Value) -> Option<&Vec<Value>> {
    match doc {
        Value::Object(map) => {
            for key in HOP_KEYS {
                if let Some(Value::Array(items)) = map.get(key) {
                    return Some(items);
                }
            }
            map.values().find_map(scan_child)
        }
        Value::Array(items) => items.iter().find_map(scan_child),
        _ => None,
    }
}

fn scan_child(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => {
            if matches!(items.first(), Some(Value::Object(_) | Value::Array(_))) {
                Some(items)
            } else {
                // Scalar-headed or empty sequences may still hold the
                // path deeper inside.
                locate_hops(value)
            }
        }
        Value::Object(_) => locate_hops(value),
        _ => None,
    }
}
