//! Persisted session shape

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use tabnest_navigation::HistoryStack;
use tabnest_tabs::{Tab, TabRegistry};

/// A tab as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTab {
    pub id: String,
    pub url: String,
    pub title: String,
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl From<&Tab> for PersistedTab {
    fn from(tab: &Tab) -> Self {
        Self {
            id: tab.id.clone(),
            url: tab.url.clone(),
            title: tab.title.clone(),
            is_loading: tab.is_loading(),
            favicon: tab.favicon.clone(),
        }
    }
}

impl From<PersistedTab> for Tab {
    fn from(tab: PersistedTab) -> Self {
        // is_loading is dropped on purpose: no earlier load can still report back
        Tab::restored(tab.id, tab.url, tab.title, tab.favicon)
    }
}

/// The four persisted slices. Each field's `Default` is what restore falls
/// back to when that slice is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub tabs: Vec<PersistedTab>,
    pub active_tab_id: String,
    pub history: BTreeMap<String, Vec<String>>,
    pub history_index: BTreeMap<String, usize>,
}

impl SessionSnapshot {
    pub fn capture(registry: &TabRegistry) -> Self {
        let mut history = BTreeMap::new();
        let mut history_index = BTreeMap::new();
        for (id, stack) in registry.histories() {
            history.insert(id.clone(), stack.entries().to_vec());
            history_index.insert(id.clone(), stack.cursor());
        }

        Self {
            tabs: registry.tabs().iter().map(PersistedTab::from).collect(),
            active_tab_id: registry.active_tab_id().to_string(),
            history,
            history_index,
        }
    }

    /// Rebuild a registry. Histories with no entries are reseeded from the
    /// tab's url; a missing or out-of-range cursor points at the last entry.
    pub fn into_registry(self) -> TabRegistry {
        let mut histories = HashMap::with_capacity(self.history.len());
        for (id, entries) in self.history {
            let last = entries.len().saturating_sub(1);
            let cursor = self.history_index.get(&id).copied().unwrap_or(last);
            match HistoryStack::from_parts_clamped(entries, cursor) {
                Ok(stack) => {
                    histories.insert(id, stack);
                }
                Err(e) => {
                    tracing::warn!(tab_id = %id, error = %e, "Discarding unusable history");
                }
            }
        }

        let active = Some(self.active_tab_id).filter(|id| !id.is_empty());
        let tabs = self.tabs.into_iter().map(Tab::from).collect();

        TabRegistry::restore(tabs, histories, active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabnest_navigation::BLANK_LOCATION;

    fn persisted(id: &str, url: &str, is_loading: bool) -> PersistedTab {
        PersistedTab {
            id: id.to_string(),
            url: url.to_string(),
            title: id.to_string(),
            is_loading,
            favicon: None,
        }
    }

    #[test]
    fn test_capture_mirrors_registry() {
        let mut registry = TabRegistry::new();
        let id = registry.create_tab();
        registry.select_active(&id);

        let snapshot = SessionSnapshot::capture(&registry);
        assert_eq!(snapshot.tabs.len(), 2);
        assert_eq!(snapshot.active_tab_id, id);
        assert_eq!(snapshot.history[&id], vec![BLANK_LOCATION.to_string()]);
        assert_eq!(snapshot.history_index[&id], 0);
    }

    #[test]
    fn test_restored_tabs_are_not_loading() {
        let snapshot = SessionSnapshot {
            tabs: vec![persisted("1", "https://a.example", true)],
            active_tab_id: "1".to_string(),
            ..SessionSnapshot::default()
        };

        let registry = snapshot.into_registry();
        assert!(!registry.get("1").unwrap().is_loading());
    }

    #[test]
    fn test_cursor_defaults_and_clamps() {
        let mut history = BTreeMap::new();
        history.insert(
            "1".to_string(),
            vec!["https://a".to_string(), "https://b".to_string()],
        );
        history.insert(
            "2".to_string(),
            vec!["https://c".to_string(), "https://d".to_string()],
        );
        history.insert("3".to_string(), Vec::new());

        let mut history_index = BTreeMap::new();
        history_index.insert("2".to_string(), 7);

        let snapshot = SessionSnapshot {
            tabs: vec![
                persisted("1", "https://b", false),
                persisted("2", "https://d", false),
                persisted("3", "https://e", false),
            ],
            active_tab_id: "2".to_string(),
            history,
            history_index,
        };

        let registry = snapshot.into_registry();
        assert_eq!(registry.history("1").unwrap().cursor(), 1);
        assert_eq!(registry.history("2").unwrap().cursor(), 1);
        // Empty history reseeded from the tab url
        assert_eq!(registry.history("3").unwrap().current(), "https://e");
        assert_eq!(registry.active_tab_id(), "2");
    }

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let snapshot = SessionSnapshot {
            tabs: vec![persisted("1", BLANK_LOCATION, false)],
            active_tab_id: "1".to_string(),
            ..SessionSnapshot::default()
        };

        let value = serde_json::to_value(&snapshot.tabs).unwrap();
        assert_eq!(value[0]["isLoading"], serde_json::json!(false));
        assert!(value[0].get("favicon").is_none());
    }
}
