//! Tab Registry
//!
//! Owns the ordered tab list, one history stack per tab and the active tab
//! id. Invariants:
//! - there is always at least one tab
//! - every tab has a history stack and no history outlives its tab
//! - ids are never reused within the registry's lifetime

use std::collections::HashMap;

use tabnest_navigation::HistoryStack;

use crate::id::TabIdGenerator;
use crate::tab::{Tab, TabUpdate};

#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    histories: HashMap<String, HistoryStack>,
    active_tab_id: String,
    ids: TabIdGenerator,
}

impl TabRegistry {
    /// A registry holding a single blank tab.
    pub fn new() -> Self {
        let mut ids = TabIdGenerator::new();
        let tab = Tab::new(ids.next_id());
        let active_tab_id = tab.id.clone();

        let mut histories = HashMap::new();
        histories.insert(tab.id.clone(), HistoryStack::new());

        Self {
            tabs: vec![tab],
            histories,
            active_tab_id,
            ids,
        }
    }

    /// Rebuild a registry from restored parts.
    ///
    /// Tabs with duplicate ids keep their first occurrence. Tabs without a
    /// history get one seeded with their url, histories for unknown tabs are
    /// dropped, and an active id that names no tab falls back to the first
    /// tab. An empty tab list yields [`TabRegistry::new`].
    pub fn restore(
        tabs: Vec<Tab>,
        mut histories: HashMap<String, HistoryStack>,
        active_tab_id: Option<String>,
    ) -> Self {
        let mut ids = TabIdGenerator::new();
        let mut kept: Vec<Tab> = Vec::with_capacity(tabs.len());

        for tab in tabs {
            if kept.iter().any(|t| t.id == tab.id) {
                tracing::warn!(tab_id = %tab.id, "Dropping restored tab with duplicate id");
                continue;
            }
            ids.observe(&tab.id);
            kept.push(tab);
        }

        if kept.is_empty() {
            return Self::new();
        }

        histories.retain(|id, _| kept.iter().any(|t| &t.id == id));
        for tab in &kept {
            histories
                .entry(tab.id.clone())
                .or_insert_with(|| HistoryStack::seeded(tab.url.clone()));
        }

        let active_tab_id = active_tab_id
            .filter(|id| kept.iter().any(|t| &t.id == id))
            .unwrap_or_else(|| kept[0].id.clone());

        Self {
            tabs: kept,
            histories,
            active_tab_id,
            ids,
        }
    }

    /// Append a blank tab with a fresh history. Does not change the selection.
    pub fn create_tab(&mut self) -> String {
        let tab = Tab::new(self.ids.next_id());
        let id = tab.id.clone();

        self.histories.insert(id.clone(), HistoryStack::new());
        self.tabs.push(tab);

        tracing::info!(tab_id = %id, "Created new tab");

        id
    }

    /// Insert a previously closed tab at `index` (clamped) under a fresh id,
    /// carrying its history along. Does not change the selection.
    pub fn reopen_tab(&mut self, index: usize, mut tab: Tab, history: HistoryStack) -> String {
        tab.id = self.ids.next_id();
        let id = tab.id.clone();

        self.histories.insert(id.clone(), history);
        let index = index.min(self.tabs.len());
        self.tabs.insert(index, tab);

        tracing::info!(tab_id = %id, index, "Reopened closed tab");

        id
    }

    /// Remove a tab and its history, returning both.
    ///
    /// Closing the last tab first creates a blank replacement, which becomes
    /// active. Closing the active tab while others remain activates the tab
    /// now last in the list. Unknown ids are ignored.
    pub fn close_tab(&mut self, tab_id: &str) -> Option<(usize, Tab, HistoryStack)> {
        let index = self.position(tab_id)?;

        if self.tabs.len() == 1 {
            let replacement = self.create_tab();
            self.active_tab_id = replacement;
        }

        let tab = self.tabs.remove(index);
        let history = self
            .histories
            .remove(tab_id)
            .unwrap_or_else(|| HistoryStack::seeded(tab.url.clone()));

        if self.active_tab_id == tab_id {
            if let Some(last) = self.tabs.last() {
                self.active_tab_id = last.id.clone();
            }
        }

        tracing::info!(tab_id = %tab_id, active_tab_id = %self.active_tab_id, "Closed tab");

        Some((index, tab, history))
    }

    /// Merge `update` into a tab. Unknown ids are a silent no-op so late
    /// updates for a closed tab cannot bring it back.
    pub fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> bool {
        match self.get_mut(tab_id) {
            Some(tab) => {
                tab.apply(update);
                true
            }
            None => {
                tracing::debug!(tab_id = %tab_id, "Ignoring update for unknown tab");
                false
            }
        }
    }

    /// Set the active tab id. Not validated; callers pass known ids.
    pub fn select_active(&mut self, tab_id: &str) {
        self.active_tab_id = tab_id.to_string();
    }

    /// Move a tab to `new_index`, clamped to the end of the list.
    pub fn move_tab(&mut self, tab_id: &str, new_index: usize) -> bool {
        let Some(current) = self.position(tab_id) else {
            return false;
        };

        let tab = self.tabs.remove(current);
        let insert_index = new_index.min(self.tabs.len());
        self.tabs.insert(insert_index, tab);
        true
    }

    pub fn get(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn get_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.position(tab_id).is_some()
    }

    pub fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn history(&self, tab_id: &str) -> Option<&HistoryStack> {
        self.histories.get(tab_id)
    }

    /// A tab together with its history, for updates that touch both.
    pub fn entry_mut(&mut self, tab_id: &str) -> Option<(&mut Tab, &mut HistoryStack)> {
        let tab = self.tabs.iter_mut().find(|t| t.id == tab_id)?;
        let history = self.histories.get_mut(tab_id)?;
        Some((tab, history))
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.get(&self.active_tab_id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.position(&self.active_tab_id)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn histories(&self) -> &HashMap<String, HistoryStack> {
        &self.histories
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}
