//! Topology path lens
//!
//! This module fetches path documents from the upstream topology service
//! and correlates the devices found on a path with the approved-network
//! store: each device is matched by IP against the stored CIDRs and
//! annotated with the union of tags from every matching record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cidr::{cidr_contains, find_ipv4_in, parse_ipv4};
use crate::extract::{extract_devices, DeviceRecord};
use crate::store::{NetworkRecord, NetworkStore};

mod client;

pub use client::{TopologyClient, UpstreamError};

// =============================================================================
// Types
// =============================================================================

/// Summary counters for a correlation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationMeta {
    /// Number of devices extracted from the path document
    pub devices_found: usize,
}

/// Result of correlating a path document against the network store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    /// The upstream payload, passed through unchanged
    pub data: Value,
    /// Devices on the path, enriched with `ip`, `approved` and `tags`
    pub devices: Vec<DeviceRecord>,
    /// Summary counters
    pub meta: CorrelationMeta,
}

// =============================================================================
// Args
// =============================================================================

/// Arguments for a topology path query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct PathQuery {
    /// Source address or object name
    #[cfg_attr(feature = "cli", clap(value_name = "SOURCE"))]
    pub source: String,

    /// Destination address or object name
    #[cfg_attr(feature = "cli", clap(value_name = "DESTINATION"))]
    pub destination: String,

    /// Service filter forwarded to the upstream (e.g. "tcp:443")
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub service: Option<String>,
}

impl PathQuery {
    /// Create a new query for a source/destination pair
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            service: None,
        }
    }

    /// Set the service filter
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

// =============================================================================
// Correlation
// =============================================================================

/// Correlate an upstream path document against a set of network records.
///
/// Pure given its two inputs. Every extracted device gets its IP
/// candidate resolved (the `ip` field when it parses as a dotted quad,
/// otherwise the first dotted quad embedded in `notes`), is tested
/// against every record's CIDR, and carries the union of tags from all
/// matching records. Devices without a resolvable IP pass through with
/// `approved = false` and no tags.
pub fn correlate(document: Value, records: &[NetworkRecord]) -> CorrelationReport {
    let mut devices = extract_devices(&document);

    for device in &mut devices {
        match ip_candidate(device) {
            Some(ip) => {
                let mut matched = false;
                let mut tags: Vec<String> = Vec::new();
                for record in records {
                    if !cidr_contains(&ip, &record.cidr) {
                        continue;
                    }
                    matched = true;
                    for tag in &record.tags {
                        if !tags.contains(tag) {
                            tags.push(tag.clone());
                        }
                    }
                }
                device.ip = ip;
                device.approved = matched;
                device.tags = tags;
            }
            None => {
                device.ip = String::new();
                device.approved = false;
                device.tags = Vec::new();
            }
        }
    }

    let meta = CorrelationMeta {
        devices_found: devices.len(),
    };
    CorrelationReport {
        data: document,
        devices,
        meta,
    }
}

fn ip_candidate(device: &DeviceRecord) -> Option<String> {
    let trimmed = device.ip.trim();
    if !trimmed.is_empty() && parse_ipv4(trimmed).is_some() {
        return Some(trimmed.to_string());
    }
    find_ipv4_in(&device.notes).map(String::from)
}

// =============================================================================
// Lens
// =============================================================================

/// Topology path lens
///
/// Combines the upstream client with the approved-network store. The
/// store is snapshotted once per call, so a correlation pass sees one
/// consistent set of records.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use pathlens::{NetworkStore, PathQuery, TopologyClient, TopologyLens, UpstreamConfig};
///
/// let upstream = UpstreamConfig::default();
/// let networks = Arc::new(NetworkStore::in_memory());
/// let lens = TopologyLens::new(TopologyClient::new(&upstream), networks);
///
/// let query = PathQuery::new("10.0.0.1", "172.16.0.9").with_service("tcp:443");
/// let report = lens.fetch_path_with_devices(&query)?;
/// println!("{} devices on path", report.meta.devices_found);
/// ```
pub struct TopologyLens {
    client: TopologyClient,
    networks: Arc<NetworkStore>,
}

impl TopologyLens {
    /// Create a new topology lens
    pub fn new(client: TopologyClient, networks: Arc<NetworkStore>) -> Self {
        Self { client, networks }
    }

    /// Fetch the raw path document for a query
    pub fn fetch_path(&self, query: &PathQuery) -> Result<Value, UpstreamError> {
        self.client
            .fetch_path(&query.source, &query.destination, query.service.as_deref())
    }

    /// Fetch a path document and correlate its devices against the store
    pub fn fetch_path_with_devices(
        &self,
        query: &PathQuery,
    ) -> Result<CorrelationReport, UpstreamError> {
        let document = self.fetch_path(query)?;
        Ok(correlate(document, &self.networks.list()))
    }

    /// Fetch the rendered path image. The upstream renderer expects a
    /// service value, so an absent filter is sent as "any".
    pub fn fetch_path_image(&self, query: &PathQuery) -> Result<Vec<u8>, UpstreamError> {
        let service = query.service.as_deref().unwrap_or("any");
        self.client
            .fetch_path_image(&query.source, &query.destination, service)
    }
}

// =============================================================================
// Tests
// =============================================================================
