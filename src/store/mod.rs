//! Persisted record stores for curated network metadata.
//!
//! Each store owns one JSON document on disk (`meta` header plus an
//! `items` list) and serializes every read-modify-write behind a single
//! lock. A missing file is an empty store; an unreadable or corrupt file
//! fails at open rather than being silently discarded. Stores can also
//! run path-less for tests and ephemeral use.

pub mod mappings;
pub mod networks;
pub mod taxonomy;

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub use mappings::{MappingRecord, MappingStore};
pub use networks::{NetworkRecord, NetworkStore, TagOutcome};
pub use taxonomy::{format_tag, tag_taxonomy, TAG_CATEGORIES};

/// Store operation failures the caller can act on.
///
/// Validation failures never leave a partial write behind: the store is
/// unchanged whenever an error comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Malformed CIDR or IP supplied by the caller.
    InvalidInput(String),
    /// The referenced record id does not exist.
    NotFound(String),
    /// The store file could not be written.
    Persist(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            StoreError::NotFound(id) => write!(f, "record not found: {id}"),
            StoreError::Persist(reason) => write!(f, "failed to persist store: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Header block written alongside the records of every store document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMeta {
    /// When this document was produced.
    pub saved_at: DateTime<Utc>,
    /// Number of records in `items`.
    pub record_count: usize,
}

impl StoreMeta {
    pub(crate) fn for_count(record_count: usize) -> Self {
        Self {
            saved_at: Utc::now(),
            record_count,
        }
    }
}

/// Full store document as persisted and as served by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument<T> {
    pub meta: StoreMeta,
    pub items: Vec<T>,
}

#[derive(Serialize)]
struct DocumentOut<'a, T> {
    meta: StoreMeta,
    items: &'a [T],
}

/// On load only `items` matters; a hand-seeded `{"items": []}` file
/// without a header is accepted.
#[derive(Deserialize)]
struct DocumentIn<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

pub(crate) fn load_items<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read store file {:?}: {}", path, e))?;
    let doc: DocumentIn<T> = serde_json::from_str(&content)
        .map_err(|e| anyhow!("Failed to parse store file {:?}: {}", path, e))?;
    Ok(doc.items)
}

pub(crate) fn save_items<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create store directory {:?}: {}", parent, e))?;
        }
    }
    let doc = DocumentOut {
        meta: StoreMeta::for_count(items.len()),
        items,
    };
    let content = serde_json::to_string_pretty(&doc)
        .map_err(|e| anyhow!("Failed to serialize store document: {}", e))?;
    fs::write(path, content)
        .map_err(|e| anyhow!("Failed to write store file {:?}: {}", path, e))?;
    info!("Saved {} records to {:?}", items.len(), path);
    Ok(())
}
