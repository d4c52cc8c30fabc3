//! Storage keys for the persisted slices

pub const DEFAULT_NAMESPACE: &str = "browser";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub tabs: String,
    pub active_tab_id: String,
    pub history: String,
    pub history_index: String,
}

impl SessionKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            tabs: format!("{}.tabs", namespace),
            active_tab_id: format!("{}.activeTabId", namespace),
            history: format!("{}.history", namespace),
            history_index: format!("{}.historyIndex", namespace),
        }
    }

    pub fn all(&self) -> [&str; 4] {
        [
            self.tabs.as_str(),
            self.active_tab_id.as_str(),
            self.history.as_str(),
            self.history_index.as_str(),
        ]
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
