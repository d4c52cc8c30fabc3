//! In-memory store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StorageError;
use crate::store::KeyValueStore;
use crate::Result;

/// A `HashMap`-backed store with an optional byte quota.
///
/// Cloning shares the underlying map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total bytes across keys and values
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        check_quota(&entries, self.quota, &[(key, value)])?;

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    /// All entries or none: the quota is checked against the whole batch
    /// before anything is written.
    fn set_many(&self, batch: &[(&str, String)]) -> Result<()> {
        let mut entries = self.entries.write();
        let pending: Vec<(&str, &str)> = batch.iter().map(|(k, v)| (*k, v.as_str())).collect();
        check_quota(&entries, self.quota, &pending)?;

        for (key, value) in pending {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Fail if writing `batch` over `entries` would exceed `quota` bytes.
fn check_quota(
    entries: &HashMap<String, String>,
    quota: Option<usize>,
    batch: &[(&str, &str)],
) -> Result<()> {
    let Some(limit) = quota else {
        return Ok(());
    };

    let mut merged: HashMap<&str, usize> = entries
        .iter()
        .map(|(k, v)| (k.as_str(), k.len() + v.len()))
        .collect();
    for (key, value) in batch {
        merged.insert(*key, key.len() + value.len());
    }

    let needed: usize = merged.values().sum();
    if needed > limit {
        let key = batch.first().map(|(k, _)| k.to_string()).unwrap_or_default();
        return Err(StorageError::QuotaExceeded { key, needed, limit });
    }
    Ok(())
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            quota: self.quota,
        }
    }
}
