//! Session Persistence Bridge
//!
//! Reads never fail the caller: each slice is validated independently and
//! a bad slice falls back to its default. Writes are best-effort: failures
//! are logged and swallowed.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;

use tabnest_storage::{JsonStoreExt, KeyValueStore};
use tabnest_tabs::TabRegistry;

use crate::error::SessionError;
use crate::keys::SessionKeys;
use crate::snapshot::{PersistedTab, SessionSnapshot};
use crate::Result;

pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    keys: SessionKeys,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            store,
            keys: SessionKeys::new(namespace),
        }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Restore the session, substituting defaults for any invalid slice.
    pub fn restore(&self) -> TabRegistry {
        let snapshot = self.load_snapshot();
        let registry = snapshot.into_registry();

        tracing::info!(
            tab_count = registry.len(),
            active_tab_id = %registry.active_tab_id(),
            "Restored session"
        );

        registry
    }

    /// Read all four slices, each falling back to its default on its own.
    pub fn load_snapshot(&self) -> SessionSnapshot {
        let tabs = self
            .read_slice::<Vec<PersistedTab>>(&self.keys.tabs)
            .and_then(|tabs| tabs.map(|t| validate_tabs(&self.keys.tabs, t)).transpose());

        SessionSnapshot {
            tabs: self.or_default(&self.keys.tabs, tabs),
            active_tab_id: self.or_default(
                &self.keys.active_tab_id,
                self.read_slice(&self.keys.active_tab_id),
            ),
            history: self.or_default(&self.keys.history, self.read_slice(&self.keys.history)),
            history_index: self.or_default(
                &self.keys.history_index,
                self.read_slice(&self.keys.history_index),
            ),
        }
    }

    /// Write all four slices. Failures are logged, never returned.
    pub fn persist(&self, registry: &TabRegistry) {
        if let Err(e) = self.try_persist(registry) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }

    pub fn try_persist(&self, registry: &TabRegistry) -> Result<()> {
        let snapshot = SessionSnapshot::capture(registry);

        let entries = [
            (self.keys.tabs.as_str(), serde_json::to_string(&snapshot.tabs)?),
            (
                self.keys.active_tab_id.as_str(),
                serde_json::to_string(&snapshot.active_tab_id)?,
            ),
            (self.keys.history.as_str(), serde_json::to_string(&snapshot.history)?),
            (
                self.keys.history_index.as_str(),
                serde_json::to_string(&snapshot.history_index)?,
            ),
        ];
        self.store.set_many(&entries)?;

        tracing::debug!(tab_count = snapshot.tabs.len(), "Persisted session");
        Ok(())
    }

    /// Remove every persisted slice.
    pub fn clear(&self) -> Result<()> {
        for key in self.keys.all() {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// `Ok(None)` when the slice is absent, `Err(Validation)` when it is
    /// present but has the wrong shape.
    fn read_slice<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.store.get_json_value(key) else {
            return Ok(None);
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| SessionError::Validation {
                slice: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn or_default<T: Default>(&self, key: &str, slice: Result<Option<T>>) -> T {
        match slice {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(slice = %key, error = %e, "Using default for invalid slice");
                T::default()
            }
        }
    }
}

/// A tabs slice must be non-empty with unique ids.
fn validate_tabs(key: &str, tabs: Vec<PersistedTab>) -> Result<Vec<PersistedTab>> {
    if tabs.is_empty() {
        return Err(SessionError::Validation {
            slice: key.to_string(),
            reason: "no tabs".to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(tabs.len());
    if let Some(dup) = tabs.iter().find(|t| !seen.insert(t.id.as_str())) {
        return Err(SessionError::Validation {
            slice: key.to_string(),
            reason: format!("duplicate tab id {}", dup.id),
        });
    }

    Ok(tabs)
}
