//! Ordered-candidate field resolution over untyped nodes.
//!
//! Upstream vendors disagree on where device attributes live: flat keys,
//! a nested device-info block, or synonyms. Each attribute is resolved
//! by trying an ordered list of key paths and taking the first that
//! yields a usable scalar.

use serde_json::Value;

/// Walk `path` segment by segment from `node`.
pub(crate) fn value_at<'a>(node: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = node;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Resolve the first candidate path with a usable value, left to right.
///
/// Unresolved attributes come back as the empty string so records carry
/// no nulls.
pub(crate) fn first_by_paths(node: &Value, paths: &[&[&str]]) -> String {
    for path in paths {
        if let Some(value) = value_at(node, path) {
            if let Some(text) = render_scalar(value) {
                return text;
            }
        }
    }
    String::new()
}

/// Scalars only: a non-blank string, a number, or a bool. Maps and
/// sequences never resolve into an attribute.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_at_walks_nested_maps() {
        let node = json!({ "device_info": { "name": "core-sw-1" } });
        assert_eq!(
            value_at(&node, &["device_info", "name"]),
            Some(&json!("core-sw-1"))
        );
        assert_eq!(value_at(&node, &["device_info", "missing"]), None);
        assert_eq!(value_at(&node, &["name"]), None);
    }

    #[test]
    fn test_value_at_stops_at_non_maps() {
        let node = json!({ "a": [1, 2] });
        assert_eq!(value_at(&node, &["a", "b"]), None);
        assert_eq!(value_at(&json!("scalar"), &["a"]), None);
    }

    #[test]
    fn test_first_by_paths_priority_order() {
        let node = json!({ "name": "flat", "device_info": { "name": "nested" } });
        let got = first_by_paths(&node, &[&["device_info", "name"], &["name"]]);
        assert_eq!(got, "nested");
    }

    #[test]
    fn test_first_by_paths_skips_empty_and_null() {
        let node = json!({ "name": "", "hostname": null, "node": "edge-1" });
        let got = first_by_paths(&node, &[&["name"], &["hostname"], &["node"]]);
        assert_eq!(got, "edge-1");
    }

    #[test]
    fn test_first_by_paths_renders_numbers_and_bools() {
        let node = json!({ "name": 42 });
        assert_eq!(first_by_paths(&node, &[&["name"]]), "42");
        let node = json!({ "state": false });
        assert_eq!(first_by_paths(&node, &[&["state"]]), "false");
    }

    #[test]
    fn test_first_by_paths_rejects_structured_values() {
        let node = json!({ "device": { "name": "x" }, "hostname": "fw-2" });
        let got = first_by_paths(&node, &[&["device"], &["hostname"]]);
        assert_eq!(got, "fw-2");
    }

    #[test]
    fn test_first_by_paths_all_miss() {
        let node = json!({ "other": 1 });
        assert_eq!(first_by_paths(&node, &[&["name"], &["hostname"]]), "");
    }
}
