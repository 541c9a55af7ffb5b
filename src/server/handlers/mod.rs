//! REST method handlers
//!
//! This module provides all the individual route handlers for the REST API.
//! Each handler is a plain axum function taking the shared [`AppState`].
//!
//! # Handler Organization
//!
//! Handlers are organized by resource:
//!
//! - `networks` - Approved-network store CRUD and the tag-by-ip upsert
//! - `mappings` - Network-mapping store CRUD
//! - `taxonomy` - Tag taxonomy lookup
//! - `topology` - Upstream path queries and device correlation

pub mod mappings;
pub mod networks;
pub mod taxonomy;
pub mod topology;

use std::sync::Arc;

use anyhow::Result;

use crate::config::PathlensConfig;
use crate::lens::topology::{TopologyClient, TopologyLens};
use crate::store::{MappingStore, NetworkStore};

/// Shared state for all REST handlers
#[derive(Clone)]
pub struct AppState {
    /// Approved-network store
    pub networks: Arc<NetworkStore>,

    /// Network-mapping store
    pub mappings: Arc<MappingStore>,

    /// Upstream path lens
    pub lens: Arc<TopologyLens>,
}

impl AppState {
    /// Create state from preconstructed parts
    pub fn new(
        networks: Arc<NetworkStore>,
        mappings: Arc<MappingStore>,
        lens: Arc<TopologyLens>,
    ) -> Self {
        Self {
            networks,
            mappings,
            lens,
        }
    }

    /// Open the stores named by the configuration and wire up the lens
    pub fn from_config(config: &PathlensConfig) -> Result<Self> {
        let networks = Arc::new(NetworkStore::open(config.network_store_path())?);
        let mappings = Arc::new(MappingStore::open(config.mapping_store_path())?);
        let client = TopologyClient::new(&config.upstream);
        let lens = Arc::new(TopologyLens::new(client, networks.clone()));
        Ok(Self::new(networks, mappings, lens))
    }
}
