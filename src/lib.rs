#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Pathlens - a network path inspection toolkit
//!
//! Pathlens queries a firewall topology service for the path between two
//! addresses, extracts the device hops from whatever JSON shape the service
//! returns, and annotates each hop with tags from a locally curated CIDR
//! inventory. It can be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! Pathlens uses a layered feature system to minimize dependencies based on your needs:
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Extraction, stores, correlation, upstream client | `serde_json`, `ureq` |
//! | `display` | Table formatting with `tabled` | `tabled`, `json_to_table` |
//! | `cli` | Full CLI binary with REST server support | All above + `clap`, `axum` |
//!
//! ## Choosing Features
//!
//! ```toml
//! # Minimal - extraction, correlation, and stores as a library
//! pathlens = { version = "0.2", default-features = false }
//!
//! # Library with table rendering
//! pathlens = { version = "0.2", default-features = false, features = ["display"] }
//!
//! # Default (CLI binary and REST server)
//! pathlens = "0.2"
//! ```
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - **[`cidr`]**: Dotted-quad and `a.b.c.d/len` arithmetic (always available)
//!
//! - **[`extract`]**: Device extraction from topology JSON (always available)
//!   - `hops`: Locating the hop array inside arbitrary response shapes
//!   - `devices`: Turning hop entries (or a whole-document scan) into records
//!   - `fields`: Candidate-path field resolution on untyped JSON
//!
//! - **[`store`]**: JSON-file-backed record stores (always available)
//!   - `networks`: Approved networks with per-CIDR tags
//!   - `mappings`: CIDR-to-application mappings
//!   - `taxonomy`: The fixed tag vocabulary
//!
//! - **[`lens`]**: High-level business logic (always available)
//!   - `topology`: Upstream path queries and tag correlation
//!
//! - **[`config`]**: Configuration management
//!
//! - **[`server`]**: REST API over the stores and the lens (requires `cli`)
//!
//! # Quick Start Examples
//!
//! ## Device Extraction
//!
//! ```rust,ignore
//! use pathlens::extract_devices;
//!
//! let doc: serde_json::Value = serde_json::from_str(&body)?;
//! for device in extract_devices(&doc) {
//!     println!("{}. {} ({})", device.hop, device.device, device.device_type);
//! }
//! ```
//!
//! ## Curating Networks
//!
//! ```rust,ignore
//! use pathlens::NetworkStore;
//!
//! let store = NetworkStore::open("~/.pathlens/approved_networks.json")?;
//! let record = store.create("10.20.0.0/16", vec!["environment:production".to_string()])?;
//! println!("created {}", record.id);
//!
//! // Upsert tags onto the /32 record for an address
//! let (record, outcome) = store.tag_by_ip("10.20.30.40", vec!["compliance:pci".to_string()])?;
//! println!("{:?} {}", outcome, record.cidr);
//! ```
//!
//! ## Path Lookup with Correlation
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pathlens::{NetworkStore, PathQuery, PathlensConfig, TopologyClient, TopologyLens};
//!
//! let config = PathlensConfig::new(&None)?;
//! let networks = Arc::new(NetworkStore::open(config.network_store_path())?);
//! let lens = TopologyLens::new(TopologyClient::new(&config.upstream), networks);
//!
//! let query = PathQuery::new("10.1.1.1", "192.168.7.9").with_service("tcp:443");
//! let report = lens.fetch_path_with_devices(&query)?;
//! for device in &report.devices {
//!     println!("{} approved={} tags={:?}", device.device, device.approved, device.tags);
//! }
//! ```
//!
//! ## Running the Server (feature = "cli")
//!
//! ```rust,ignore
//! use pathlens::{start_server, AppState, PathlensConfig, ServerConfig};
//!
//! let config = PathlensConfig::new(&None)?;
//! let state = AppState::from_config(&config)?;
//! let server = ServerConfig::new()
//!     .with_address(config.host.clone())
//!     .with_port(config.port);
//! start_server(state, server).await?;
//! ```

pub mod cidr;
pub mod config;
pub mod extract;
pub mod lens;
pub mod store;

// Server module - requires CLI feature
#[cfg(feature = "cli")]
pub mod server;

// =============================================================================
// Configuration (always available)
// =============================================================================

pub use config::{PathlensConfig, UpstreamConfig};

// =============================================================================
// CIDR Engine (always available)
// =============================================================================

pub use cidr::{
    cidr_contains, find_ipv4_in, ipv4_to_string, looks_like_ipv4_or_cidr, parse_ipv4,
    validate_cidr,
};

// =============================================================================
// Extraction (always available)
// =============================================================================

pub use extract::{extract_devices, locate_hops, DeviceRecord};

// =============================================================================
// Stores (always available)
// =============================================================================

pub use store::{StoreDocument, StoreError, StoreMeta};

// Approved networks store
pub use store::{NetworkRecord, NetworkStore, TagOutcome};

// Application mapping store
pub use store::{MappingRecord, MappingStore};

// Tag vocabulary
pub use store::{format_tag, tag_taxonomy, TAG_CATEGORIES};

// =============================================================================
// Topology Lens (always available)
// =============================================================================

pub use lens::topology::{
    correlate, CorrelationMeta, CorrelationReport, PathQuery, TopologyClient, TopologyLens,
    UpstreamError,
};

// =============================================================================
// Server Module (REST API) - requires "cli" feature
// =============================================================================

#[cfg(feature = "cli")]
pub use server::{create_router, start_server, ApiError, AppState, ServerConfig};
