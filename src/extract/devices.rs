//! Device collection over a located hop sequence or the whole document.

use std::collections::HashSet;

use serde_json::Value;

use super::fields::first_by_paths;
use super::DeviceRecord;

// Candidate key paths per attribute, tried left to right.
const ORDERED_NAME_PATHS: &[&[&str]] = &[
    &["device_info", "name"],
    &["device", "name"],
    &["name"],
    &["hostname"],
    &["node"],
    &["appliance"],
    &["device"],
];
const SCAN_NAME_PATHS: &[&[&str]] =
    &[&["device_info", "name"], &["name"], &["hostname"], &["device"]];
const TYPE_PATHS: &[&[&str]] = &[
    &["device_info", "type"],
    &["device_info", "device_type"],
    &["type"],
];
const IFACE_PATHS: &[&[&str]] = &[
    &["interface"],
    &["ingress_interface"],
    &["egress_interface"],
    &["ifname"],
];
const IP_PATHS: &[&[&str]] = &[&["ip"], &["address"]];
const ACTION_PATHS: &[&[&str]] = &[&["action"], &["status"], &["state"]];

/// Human-readable composite of the ancillary fields, empty segments
/// dropped.
fn build_notes(ip: &str, action: &str) -> String {
    let mut parts = Vec::new();
    if !ip.is_empty() {
        parts.push(format!("IP: {ip}"));
    }
    if !action.is_empty() {
        parts.push(format!("Status: {action}"));
    }
    parts.join(" • ")
}

fn resolve(node: &Value, name_paths: &[&[&str]]) -> Option<DeviceRecord> {
    let device = first_by_paths(node, name_paths);
    if device.is_empty() {
        return None;
    }
    let device_type = first_by_paths(node, TYPE_PATHS);
    let iface = first_by_paths(node, IFACE_PATHS);
    let ip = first_by_paths(node, IP_PATHS);
    let action = first_by_paths(node, ACTION_PATHS);
    let notes = build_notes(&ip, &action);
    Some(DeviceRecord {
        hop: 0,
        device,
        device_type,
        iface,
        ip,
        notes,
        approved: false,
        tags: Vec::new(),
    })
}

/// Ordered-path mode: one record per hop with a resolvable name.
///
/// The dedup key carries the source position, so identical hops at
/// different positions stay distinct while a repeat of the same logical
/// key collapses. Hop numbers are assigned by the caller after both
/// modes settle.
pub(crate) fn collect_ordered(hops: &[Value]) -> Vec<DeviceRecord> {
    let mut out = Vec::new();
    let mut seen: HashSet<(usize, String, String, String, String)> = HashSet::new();
    for (position, hop) in hops.iter().enumerate() {
        let Some(record) = resolve(hop, ORDERED_NAME_PATHS) else {
            continue;
        };
        let key = (
            position,
            record.device.clone(),
            record.device_type.clone(),
            record.iface.clone(),
            record.notes.clone(),
        );
        if seen.insert(key) {
            out.push(record);
        }
    }
    out
}

/// Fallback mode: depth-first scan of the whole document for nodes
/// carrying a `device_info` map. Emission order is traversal order; the
/// dedup key has no position, so structurally identical blocks at
/// different depths collapse to one record.
pub(crate) fn collect_scan(doc: &Value) -> Vec<DeviceRecord> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    scan_node(doc, &mut out, &mut seen);
    out
}

fn scan_node(
    node: &Value,
    out: &mut Vec<DeviceRecord>,
    seen: &mut HashSet<(String, String, String, String)>,
) {
    match node {
        Value::Object(map) => {
            if matches!(map.get("device_info"), Some(Value::Object(_))) {
                if let Some(record) = resolve(node, SCAN_NAME_PATHS) {
                    let key = (
                        record.device.clone(),
                        record.device_type.clone(),
                        record.iface.clone(),
                        record.notes.clone(),
                    );
                    if seen.insert(key) {
                        out.push(record);
                    }
                }
            }
            for value in map.values() {
                scan_node(value, out, seen);
            }
        }
        Value::Array(items) => {
            for item in items {
                scan_node(item, out, seen);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ordered_resolves_name_synonyms() {
        let hops = vec![
            json!({ "device_info": { "name": "core-1" } }),
            json!({ "device": { "name": "core-2" } }),
            json!({ "hostname": "core-3" }),
            json!({ "node": "core-4" }),
            json!({ "appliance": "core-5" }),
            json!({ "device": "core-6" }),
        ];
        let names: Vec<String> = collect_ordered(&hops).into_iter().map(|d| d.device).collect();
        assert_eq!(names, ["core-1", "core-2", "core-3", "core-4", "core-5", "core-6"]);
    }

    #[test]
    fn test_ordered_skips_unnamed_hops() {
        let hops = vec![
            json!({ "ip": "10.0.0.1" }),
            json!({ "name": "r2", "ip": "10.0.0.2" }),
        ];
        let out = collect_ordered(&hops);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].device, "r2");
    }

    #[test]
    fn test_ordered_keeps_duplicates_at_different_positions() {
        let hops = vec![json!({ "name": "fw" }), json!({ "name": "fw" })];
        assert_eq!(collect_ordered(&hops).len(), 2);
    }

    #[test]
    fn test_notes_composition() {
        let hops = vec![
            json!({ "name": "r1", "ip": "10.0.0.17", "action": "permit" }),
            json!({ "name": "r2", "status": "drop" }),
            json!({ "name": "r3" }),
        ];
        let out = collect_ordered(&hops);
        assert_eq!(out[0].notes, "IP: 10.0.0.17 • Status: permit");
        assert_eq!(out[1].notes, "Status: drop");
        assert_eq!(out[2].notes, "");
    }

    #[test]
    fn test_ordered_type_and_iface_candidates() {
        let hops = vec![json!({
            "name": "fw-edge",
            "device_info": { "device_type": "firewall" },
            "ingress_interface": "eth0/1",
            "address": "172.16.0.9"
        })];
        let out = collect_ordered(&hops);
        assert_eq!(out[0].device_type, "firewall");
        assert_eq!(out[0].iface, "eth0/1");
        assert_eq!(out[0].ip, "172.16.0.9");
    }

    #[test]
    fn test_scan_requires_device_info_block() {
        let doc = json!({
            "a": { "name": "ignored-no-device-info" },
            "b": { "device_info": { "name": "kept" } }
        });
        let out = collect_scan(&doc);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].device, "kept");
    }

    #[test]
    fn test_scan_collapses_identical_blocks() {
        let block = json!({ "device_info": { "name": "fw-1", "type": "fw" } });
        let doc = json!({ "x": block, "y": { "z": block } });
        assert_eq!(collect_scan(&doc).len(), 1);
    }

    #[test]
    fn test_scan_traversal_order_is_declaration_order() {
        let doc = json!({
            "later": { "device_info": { "name": "a-second" } },
            "deep": { "inner": { "device_info": { "name": "b-third" } } }
        });
        let doc = json!({ "first": { "device_info": { "name": "first" } }, "rest": doc });
        let names: Vec<String> = collect_scan(&doc).into_iter().map(|d| d.device).collect();
        assert_eq!(names, ["first", "a-second", "b-third"]);
    }

    #[test]
    fn test_scan_walks_arrays() {
        let doc = json!({ "groups": [
            { "device_info": { "name": "r1" } },
            [ { "device_info": { "name": "r2" } } ]
        ]});
        assert_eq!(collect_scan(&doc).len(), 2);
    }
}
