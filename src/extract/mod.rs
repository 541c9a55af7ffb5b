//! Device extraction from untyped topology documents.
//!
//! The upstream service returns one JSON document per path query with no
//! contractual schema. Extraction recovers an ordered list of traversed
//! devices from it: locate a hop sequence ([`hops::locate_hops`]),
//! resolve per-hop attributes through ordered candidate paths, and fall
//! back to scanning the whole document for device-info blocks when no
//! usable sequence exists. The whole pass is total: any shape that
//! matches nothing yields an empty list, never an error, since partial
//! results beat hard failures on a dashboard.

pub mod devices;
pub mod fields;
pub mod hops;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use hops::locate_hops;

/// One traversed network element recovered from a path document.
///
/// `approved` and `tags` stay at their defaults until correlation
/// attributes stored network records to the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// 1-based position in emission order.
    pub hop: usize,
    /// Display name. Extraction never emits a record without one.
    pub device: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub iface: String,
    #[serde(default)]
    pub ip: String,
    pub notes: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Extract every recoverable device from `doc`, in path order.
///
/// Ordered mode runs when a non-empty hop sequence is located and it
/// yields at least one named device; otherwise the whole-document scan
/// takes over. Hop numbers are assigned 1..N over the final list in
/// both modes.
pub fn extract_devices(doc: &Value) -> Vec<DeviceRecord> {
    let mut records = match locate_hops(doc) {
        Some(hops) if !hops.is_empty() => devices::collect_ordered(hops),
        _ => Vec::new(),
    };
    if records.is_empty() {
        records = devices::collect_scan(doc);
    }
    for (index, record) in records.iter_mut().enumerate() {
        record.hop = index + 1;
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_hops_array_emits_in_input_order() {
        let doc = json!({ "hops": [
            { "name": "edge-rtr", "ip": "10.1.0.1" },
            { "name": "core-fw", "ip": "10.1.0.2" },
            { "name": "dc-sw", "ip": "10.1.0.3" }
        ]});
        let out = extract_devices(&doc);
        assert_eq!(out.len(), 3);
        for (i, record) in out.iter().enumerate() {
            assert_eq!(record.hop, i + 1);
        }
        assert_eq!(out[0].device, "edge-rtr");
        assert_eq!(out[2].device, "dc-sw");
    }

    #[test]
    fn test_hop_numbers_stay_sequential_when_hops_are_skipped() {
        let doc = json!({ "path": [
            { "ip": "10.0.0.1" },
            { "name": "r2" },
            { "ip": "10.0.0.3" },
            { "name": "r4" }
        ]});
        let out = extract_devices(&doc);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].hop, out[0].device.as_str()), (1, "r2"));
        assert_eq!((out[1].hop, out[1].device.as_str()), (2, "r4"));
    }

    #[test]
    fn test_duplicate_hops_at_different_positions_survive() {
        let doc = json!({ "hops": [
            { "name": "fw", "type": "firewall" },
            { "name": "fw", "type": "firewall" }
        ]});
        let out = extract_devices(&doc);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].device, out[1].device);
        assert_ne!(out[0].hop, out[1].hop);
    }

    #[test]
    fn test_unrecognizable_documents_yield_empty() {
        for doc in [
            json!({ "status": "ok", "count": 3 }),
            json!(null),
            json!("no devices"),
            json!([1, 2, 3]),
            json!({}),
        ] {
            assert!(extract_devices(&doc).is_empty());
        }
    }

    #[test]
    fn test_empty_named_array_falls_back_to_scan() {
        let doc = json!({
            "path": [],
            "detail": { "device_info": { "name": "fallback-dev" } }
        });
        let out = extract_devices(&doc);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].device, "fallback-dev");
        assert_eq!(out[0].hop, 1);
    }

    #[test]
    fn test_nameless_ordered_pass_falls_back_to_scan() {
        let doc = json!({
            "hops": [ { "ip": "10.0.0.1" }, { "ip": "10.0.0.2" } ],
            "summary": { "device_info": { "name": "only-via-scan" } }
        });
        let out = extract_devices(&doc);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].device, "only-via-scan");
    }

    #[test]
    fn test_scan_mode_renumbers_sequentially() {
        let doc = json!({
            "a": { "device_info": { "name": "d1" } },
            "b": { "c": { "device_info": { "name": "d2" } } }
        });
        let out = extract_devices(&doc);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].hop, out[0].device.as_str()), (1, "d1"));
        assert_eq!((out[1].hop, out[1].device.as_str()), (2, "d2"));
    }

    #[test]
    fn test_nested_device_info_beats_flat_name() {
        let doc = json!({ "hops": [
            { "name": "flat", "device_info": { "name": "nested", "type": "router" } }
        ]});
        let out = extract_devices(&doc);
        assert_eq!(out[0].device, "nested");
        assert_eq!(out[0].device_type, "router");
    }

    #[test]
    fn test_record_serialization_shape() {
        let doc = json!({ "hops": [
            { "name": "r1", "type": "router", "interface": "ge-0/0/0",
              "ip": "10.0.0.17", "action": "permit" }
        ]});
        let out = extract_devices(&doc);
        let value = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(value["hop"], 1);
        assert_eq!(value["device"], "r1");
        assert_eq!(value["type"], "router");
        assert_eq!(value["iface"], "ge-0/0/0");
        assert_eq!(value["ip"], "10.0.0.17");
        assert_eq!(value["notes"], "IP: 10.0.0.17 • Status: permit");
        assert_eq!(value["approved"], false);
        assert_eq!(value["tags"], json!([]));
    }
}
