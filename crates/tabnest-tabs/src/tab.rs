//! Tab data structure
//!
//! A tab shows a title (with a `New Tab` fallback), an optional favicon and
//! a loading indicator. Every load a tab starts is tagged with a generation
//! number; completions carrying an older generation belong to a superseded
//! navigation and are dropped.

use tabnest_navigation::{fallback_title, BLANK_LOCATION, FAILED_TITLE, NEW_TAB_TITLE};

use crate::error::TabError;
use crate::state::LoadState;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Unique identifier, stable for the tab's lifetime
    pub id: String,
    /// Current location
    pub url: String,
    /// Page title
    pub title: String,
    /// Favicon URL if the renderer reported one
    pub favicon: Option<String>,
    /// Position in the load state machine
    pub load_state: LoadState,
    /// Generation of the most recently started load
    generation: u64,
}

/// Partial update merged into a tab record. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub favicon: Option<Option<String>>,
    pub is_loading: Option<bool>,
}

impl TabUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn favicon(favicon: Option<String>) -> Self {
        Self {
            favicon: Some(favicon),
            ..Self::default()
        }
    }
}

impl Tab {
    /// A blank tab at the start location.
    pub fn new(id: String) -> Self {
        Self {
            id,
            url: BLANK_LOCATION.to_string(),
            title: NEW_TAB_TITLE.to_string(),
            favicon: None,
            load_state: LoadState::Idle,
            generation: 0,
        }
    }

    /// A tab rebuilt from stored fields. Restored tabs are never loading:
    /// a load started by an earlier process can never report back.
    pub fn restored(id: String, url: String, title: String, favicon: Option<String>) -> Self {
        Self {
            id,
            url,
            title,
            favicon,
            load_state: LoadState::Idle,
            generation: 0,
        }
    }

    pub fn transition_to(&mut self, new_state: LoadState) -> Result<()> {
        if !self.load_state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                from: self.load_state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            tab_id = %self.id,
            from = %self.load_state,
            to = %new_state,
            generation = self.generation,
            "Tab load state transition"
        );

        self.load_state = new_state;
        Ok(())
    }

    /// Start a new load, optionally at a new location. Returns the
    /// generation the renderer must echo back on completion.
    pub fn begin_load(&mut self, url: Option<String>) -> u64 {
        if let Some(url) = url {
            self.url = url;
        }
        self.generation += 1;
        self.load_state = LoadState::Loading;

        tracing::debug!(
            tab_id = %self.id,
            url = %self.url,
            generation = self.generation,
            "Load started"
        );

        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// The renderer began loading for `generation`. Only `begin_load` enters
    /// `Loading`, so this acknowledges a load already in flight.
    pub fn load_started(&mut self, generation: u64) -> bool {
        self.is_in_flight(generation)
    }

    /// `generation` is the latest load and it has not settled yet.
    fn is_in_flight(&self, generation: u64) -> bool {
        self.is_current(generation) && self.is_loading()
    }

    /// The load for `generation` finished. A missing or blank title is
    /// replaced by the location's host name.
    pub fn load_completed(&mut self, generation: u64, title: Option<&str>) -> bool {
        if !self.is_in_flight(generation) || self.transition_to(LoadState::Idle).is_err() {
            return false;
        }

        self.title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => fallback_title(&self.url),
        };
        true
    }

    /// The load for `generation` failed.
    pub fn load_failed(&mut self, generation: u64) -> bool {
        if !self.is_in_flight(generation) || self.transition_to(LoadState::Failed).is_err() {
            return false;
        }

        self.title = FAILED_TITLE.to_string();
        true
    }

    /// Merge a partial update into the record.
    pub fn apply(&mut self, update: TabUpdate) {
        if let Some(url) = update.url {
            self.url = url;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(favicon) = update.favicon {
            self.favicon = favicon;
        }
        match update.is_loading {
            Some(true) => self.load_state = LoadState::Loading,
            Some(false) if self.load_state.is_loading() => self.load_state = LoadState::Idle,
            _ => {}
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state.is_loading()
    }

    pub fn is_failed(&self) -> bool {
        self.load_state == LoadState::Failed
    }

    /// Title for display, falling back to `New Tab`.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            NEW_TAB_TITLE
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab() {
        let tab = Tab::new("1".to_string());
        assert_eq!(tab.url, BLANK_LOCATION);
        assert_eq!(tab.title, NEW_TAB_TITLE);
        assert!(!tab.is_loading());
        assert_eq!(tab.generation(), 0);
    }

    #[test]
    fn test_load_lifecycle() {
        let mut tab = Tab::new("1".to_string());

        let generation = tab.begin_load(Some("https://example.com".to_string()));
        assert!(tab.is_loading());
        assert_eq!(tab.url, "https://example.com");

        assert!(tab.load_completed(generation, Some("Example Domain")));
        assert_eq!(tab.load_state, LoadState::Idle);
        assert_eq!(tab.title, "Example Domain");
    }

    #[test]
    fn test_unreadable_title_falls_back_to_host() {
        let mut tab = Tab::new("1".to_string());
        let generation = tab.begin_load(Some("https://docs.rs/serde".to_string()));

        assert!(tab.load_completed(generation, Some("   ")));
        assert_eq!(tab.title, "docs.rs");
    }

    #[test]
    fn test_failed_load_is_terminal_until_next_load() {
        let mut tab = Tab::new("1".to_string());
        let generation = tab.begin_load(Some("https://blocked.example".to_string()));

        assert!(tab.load_failed(generation));
        assert!(tab.is_failed());
        assert_eq!(tab.title, FAILED_TITLE);

        // A late success for the same navigation cannot clear the failure
        assert!(!tab.load_completed(generation, Some("Blocked")));
        assert!(tab.is_failed());

        let retry = tab.begin_load(None);
        assert!(tab.is_loading());
        assert!(tab.load_completed(retry, Some("Now it works")));
    }

    #[test]
    fn test_late_start_cannot_revive_failed_load() {
        let mut tab = Tab::new("1".to_string());
        let generation = tab.begin_load(Some("https://blocked.example".to_string()));
        assert!(tab.load_failed(generation));

        assert!(!tab.load_started(generation));
        assert!(tab.is_failed());
        assert!(!tab.load_completed(generation, Some("Resurrected")));
        assert!(tab.is_failed());
        assert_eq!(tab.title, FAILED_TITLE);
    }

    #[test]
    fn test_outcome_without_pending_load_is_ignored() {
        let mut tab = Tab::new("1".to_string());
        assert!(!tab.load_completed(0, None));
        assert!(!tab.load_failed(0));
        assert_eq!(tab.title, NEW_TAB_TITLE);
        assert_eq!(tab.load_state, LoadState::Idle);

        let generation = tab.begin_load(Some("https://example.com".to_string()));
        assert!(tab.load_started(generation));
        assert!(tab.load_completed(generation, Some("Example")));

        // A repeated completion does not touch the settled tab
        tab.title = "Renamed".to_string();
        assert!(!tab.load_completed(generation, Some("Example")));
        assert!(!tab.load_failed(generation));
        assert_eq!(tab.title, "Renamed");
        assert_eq!(tab.load_state, LoadState::Idle);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut tab = Tab::new("1".to_string());
        let first = tab.begin_load(Some("https://slow.example".to_string()));
        let second = tab.begin_load(Some("https://fast.example".to_string()));

        assert!(tab.load_completed(second, Some("Fast")));
        assert!(!tab.load_completed(first, Some("Slow")));
        assert!(!tab.load_failed(first));
        assert!(!tab.load_started(first));

        assert_eq!(tab.title, "Fast");
        assert_eq!(tab.url, "https://fast.example");
        assert_eq!(tab.load_state, LoadState::Idle);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut tab = Tab::new("1".to_string());
        tab.apply(TabUpdate::title("Renamed"));
        tab.apply(TabUpdate::favicon(Some("https://x/favicon.ico".to_string())));

        assert_eq!(tab.title, "Renamed");
        assert_eq!(tab.favicon.as_deref(), Some("https://x/favicon.ico"));
        assert_eq!(tab.url, BLANK_LOCATION);

        tab.apply(TabUpdate {
            is_loading: Some(true),
            ..TabUpdate::default()
        });
        assert!(tab.is_loading());
    }

    #[test]
    fn test_display_title_fallback() {
        let mut tab = Tab::new("1".to_string());
        tab.title.clear();
        assert_eq!(tab.display_title(), NEW_TAB_TITLE);
    }
}
