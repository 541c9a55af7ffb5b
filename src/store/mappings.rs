//! Network-to-application mappings: which business applications live
//! behind a CIDR range.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{generate_id, load_items, save_items, StoreDocument, StoreError, StoreMeta};
use crate::cidr::validate_cidr;

const ID_PREFIX: &str = "m_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub id: String,
    pub cidr: String,
    #[serde(default)]
    pub applications: Vec<String>,
}

/// Collection of [`MappingRecord`]s. Same validation, atomicity, and
/// locking contract as the network store, without the tag-by-ip path.
pub struct MappingStore {
    path: Option<PathBuf>,
    items: Mutex<Vec<MappingRecord>>,
}

impl MappingStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = load_items(&path)?;
        info!("Opened mapping store {:?} ({} records)", path, items.len());
        Ok(Self {
            path: Some(path),
            items: Mutex::new(items),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            items: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MappingRecord>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, items: &[MappingRecord]) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => {
                save_items(path, items).map_err(|e| StoreError::Persist(e.to_string()))
            }
            None => Ok(()),
        }
    }

    pub fn list(&self) -> Vec<MappingRecord> {
        self.lock().clone()
    }

    pub fn document(&self) -> StoreDocument<MappingRecord> {
        let items = self.list();
        StoreDocument {
            meta: StoreMeta::for_count(items.len()),
            items,
        }
    }

    pub fn create(
        &self,
        cidr: &str,
        applications: Vec<String>,
    ) -> Result<MappingRecord, StoreError> {
        let cidr = cidr.trim();
        if cidr.is_empty() {
            return Err(StoreError::InvalidInput("cidr is required".to_string()));
        }
        validate_cidr(cidr).map_err(|reason| StoreError::InvalidInput(reason.to_string()))?;
        let record = MappingRecord {
            id: generate_id(ID_PREFIX),
            cidr: cidr.to_string(),
            applications,
        };
        let mut items = self.lock();
        let mut next = items.clone();
        next.push(record.clone());
        self.persist(&next)?;
        *items = next;
        Ok(record)
    }

    pub fn update(
        &self,
        id: &str,
        cidr: Option<&str>,
        applications: Option<Vec<String>>,
    ) -> Result<MappingRecord, StoreError> {
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
        if let Some(a) = applications {
            next[index].applications = a;
        }
        self.persist(&next)?;
        *items = next;
        Ok(items[index].clone())
    }

    pub fn delete(&self, id: &str) -> Result<MappingRecord, StoreError> {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_m_prefix() {
        let store = MappingStore::in_memory();
        let record = store
            .create("172.16.0.0/12", vec!["SAP-ERP".into()])
            .unwrap();
        assert!(record.id.starts_with("m_"));
        assert_eq!(record.applications, vec!["SAP-ERP".to_string()]);
    }

    #[test]
    fn test_create_enforces_cidr_validation() {
        let store = MappingStore::in_memory();
        assert!(matches!(
            store.create("300.0.0.1", vec![]),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_update_and_delete_contract() {
        let store = MappingStore::in_memory();
        let record = store.create("10.2.0.0/16", vec![]).unwrap();

        let updated = store
            .update(&record.id, None, Some(vec!["CRM".into(), "SharePoint".into()]))
            .unwrap();
        assert_eq!(updated.applications.len(), 2);
        assert_eq!(updated.cidr, "10.2.0.0/16");

        assert!(matches!(
            store.update("m_missing", None, None),
            Err(StoreError::NotFound(_))
        ));

        let removed = store.delete(&record.id).unwrap();
        assert_eq!(removed.id, record.id);
        assert!(matches!(
            store.delete(&record.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_invalid_cidr_leaves_record_alone() {
        let store = MappingStore::in_memory();
        let record = store.create("10.2.0.0/16", vec!["CRM".into()]).unwrap();
        let err = store
            .update(&record.id, Some("10.2.0.0/40"), Some(vec![]))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(store.list()[0], record);
    }

    #[test]
    fn test_mappings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network_mappings.json");

        let store = MappingStore::open(&path).unwrap();
        let record = store.create("10.2.0.0/16", vec!["CRM".into()]).unwrap();
        drop(store);

        let reopened = MappingStore::open(&path).unwrap();
        assert_eq!(reopened.list(), vec![record]);
    }
}
