//! Approved-network records: CIDR ranges carrying classification tags.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{generate_id, load_items, save_items, StoreDocument, StoreError, StoreMeta};
use crate::cidr::{parse_ipv4, validate_cidr};

const ID_PREFIX: &str = "an_";

/// One approved network: a CIDR range and the tags attributed to any
/// device whose address falls inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub id: String,
    pub cidr: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Whether [`NetworkStore::tag_by_ip`] merged into an existing `/32`
/// record or created a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Created,
    Updated,
}

/// Collection of [`NetworkRecord`]s behind a single mutation lock.
///
/// Every mutation validates first, persists the updated snapshot, and
/// only then commits it to memory, so a failed write leaves both the
/// file and the in-memory view untouched.
pub struct NetworkStore {
    path: Option<PathBuf>,
    items: Mutex<Vec<NetworkRecord>>,
}

impl NetworkStore {
    /// Open the store backed by `path`, loading any existing document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = load_items(&path)?;
        info!("Opened network store {:?} ({} records)", path, items.len());
        Ok(Self {
            path: Some(path),
            items: Mutex::new(items),
        })
    }

    /// Ephemeral store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            items: Mutex::new(Vec::new()),
        }
    }

    // The guarded Vec stays valid across any panic point, so a poisoned
    // lock is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, Vec<NetworkRecord>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, items: &[NetworkRecord]) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => {
                save_items(path, items).map_err(|e| StoreError::Persist(e.to_string()))
            }
            None => Ok(()),
        }
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<NetworkRecord> {
        self.lock().clone()
    }

    /// Snapshot in the persisted document shape, for list endpoints.
    pub fn document(&self) -> StoreDocument<NetworkRecord> {
        let items = self.list();
        StoreDocument {
            meta: StoreMeta::for_count(items.len()),
            items,
        }
    }

    /// Append a new record. `cidr` must pass full validation.
    pub fn create(&self, cidr: &str, tags: Vec<String>) -> Result<NetworkRecord, StoreError> {
        let cidr = cidr.trim();
        if cidr.is_empty() {
            return Err(StoreError::InvalidInput("cidr is required".to_string()));
        }
        validate_cidr(cidr).map_err(|reason| StoreError::InvalidInput(reason.to_string()))?;
        let record = NetworkRecord {
            id: generate_id(ID_PREFIX),
            cidr: cidr.to_string(),
            tags,
        };
        let mut items = self.lock();
        let mut next = items.clone();
        next.push(record.clone());
        self.persist(&next)?;
        *items = next;
        Ok(record)
    }

    /// Update fields of an existing record.
    ///
    /// An absent or empty `cidr` leaves the stored range alone; a
    /// present one must validate before anything is applied, so a
    /// rejected update changes neither field.
    pub fn update(
        &self,
        id: &str,
        cidr: Option<&str>,
        tags: Option<Vec<String>>,
    ) -> Result<NetworkRecord, StoreError> {
        let cidr = cidr.map(str::trim).filter(|c| !c.is_empty());
        let mut items = self.lock();
        let index = items
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(c) = cidr {
            validate_cidr(c).map_err(|reason| StoreError::InvalidInput(reason.to_string()))?;
        }
        let mut next = items.clone();
        if let Some(c) = cidr {
            next[index].cidr = c.to_string();
        }
        if let Some(t) = tags {
            next[index].tags = t;
        }
        self.persist(&next)?;
        *items = next;
        Ok(items[index].clone())
    }

    /// Remove a record, returning it.
    pub fn delete(&self, id: &str) -> Result<NetworkRecord, StoreError> {
        let mut items = self.lock();
        let index = items
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut next = items.clone();
        let removed = next.remove(index);
        self.persist(&next)?;
        *items = next;
        Ok(removed)
    }

    /// Merge `tags` into the `/32` record for `ip`, creating it if none
    /// exists yet.
    ///
    /// The union keeps existing tags in place and appends new unseen
    /// ones, so two calls with different tag sets end up as one record
    /// holding both. Only an exact `"<ip>/32"` entry counts as existing;
    /// a wider range covering the address does not.
    pub fn tag_by_ip(
        &self,
        ip: &str,
        tags: Vec<String>,
    ) -> Result<(NetworkRecord, TagOutcome), StoreError> {
        let ip = ip.trim();
        if parse_ipv4(ip).is_none() {
            return Err(StoreError::InvalidInput(
                "ip must be a valid IPv4 address".to_string(),
            ));
        }
        let target = format!("{ip}/32");
        let mut items = self.lock();
        let mut next = items.clone();
        if let Some(record) = next.iter_mut().find(|r| r.cidr == target) {
            let mut merged: Vec<String> = Vec::new();
            for tag in record.tags.iter().cloned().chain(tags) {
                if !merged.contains(&tag) {
                    merged.push(tag);
                }
            }
            record.tags = merged;
            let updated = record.clone();
            self.persist(&next)?;
            *items = next;
            return Ok((updated, TagOutcome::Updated));
        }
        let record = NetworkRecord {
            id: generate_id(ID_PREFIX),
            cidr: target,
            tags,
        };
        next.push(record.clone());
        self.persist(&next)?;
        *items = next;
        Ok((record, TagOutcome::Created))
    }
}
