//! Main browser state container
//!
//! The [`Browser`] is the navigation controller. It is the only thing that
//! mutates the tab registry, and it mirrors the registry to storage after
//! every change. Each tab runs its own small state machine:
//!
//! ```text
//! Idle ──navigate/back/forward/refresh/home──▶ Loading ──complete──▶ Idle
//!                                                 └──────error─────▶ Failed
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tabnest_navigation::{normalize_location, HistoryStack};
use tabnest_session::SessionStore;
use tabnest_storage::{Database, KeyValueStore, MemoryStore};
use tabnest_tabs::{Tab, TabRegistry, TabUpdate};

use crate::config::Config;
use crate::shortcuts::Shortcut;
use crate::Result;

/// Handed to the renderer when a load starts; echoed back on completion.
///
/// A ticket only counts while its generation is the tab's latest. Anything
/// older answers a superseded navigation and is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub tab_id: String,
    pub url: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct ClosedTab {
    tab: Tab,
    history: HistoryStack,
    index: usize,
}

/// Main browser instance
pub struct Browser {
    /// Configuration
    config: Config,
    /// Tabs, histories and the active selection
    registry: TabRegistry,
    /// Persistence bridge
    sessions: SessionStore,
    recently_closed: Vec<ClosedTab>,
}

impl Browser {
    /// Open the on-disk store named by the config and restore the session.
    pub fn open(config: Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::with_store(config, Arc::new(db)))
    }

    /// A browser whose session lives only in memory.
    pub fn in_memory(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Restore the session from `store`. Never fails: invalid persisted data
    /// falls back to defaults.
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let sessions = SessionStore::new(store, &config.storage_namespace);
        let registry = sessions.restore();

        let browser = Self {
            config,
            registry,
            sessions,
            recently_closed: Vec::new(),
        };

        // Write back the validated state so corrupt slices do not linger
        browser.persist();

        tracing::info!(tab_count = browser.registry.len(), "Browser initialized");

        browser
    }

    // === Queries ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn tabs(&self) -> &[Tab] {
        self.registry.tabs()
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.registry.get(tab_id)
    }

    pub fn active_tab_id(&self) -> &str {
        self.registry.active_tab_id()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.registry.active_tab()
    }

    pub fn history(&self, tab_id: &str) -> Option<&HistoryStack> {
        self.registry.history(tab_id)
    }

    pub fn can_go_back(&self) -> bool {
        self.active_history()
            .map_or(false, HistoryStack::can_step_back)
    }

    pub fn can_go_forward(&self) -> bool {
        self.active_history()
            .map_or(false, HistoryStack::can_step_forward)
    }

    pub fn closed_tab_count(&self) -> usize {
        self.recently_closed.len()
    }

    fn active_history(&self) -> Option<&HistoryStack> {
        self.registry.history(self.registry.active_tab_id())
    }

    // === Navigation (active tab) ===

    /// Normalize `input`, push it onto the active tab's history and start
    /// loading it. Blank input is ignored.
    pub fn navigate(&mut self, input: &str) -> Option<LoadTicket> {
        let location = normalize_location(input, &self.config.default_scheme)?;
        let tab_id = self.registry.active_tab_id().to_string();

        let (_, history) = self.registry.entry_mut(&tab_id)?;
        history.push(location.clone());

        tracing::debug!(tab_id = %tab_id, url = %location, "Navigate");

        self.start_load(&tab_id, Some(location))
    }

    /// Step back in the active tab's history. `None` at the first entry.
    pub fn back(&mut self) -> Option<LoadTicket> {
        self.step_history(|history| history.step_back().map(str::to_string))
    }

    /// Step forward in the active tab's history. `None` at the last entry.
    pub fn forward(&mut self) -> Option<LoadTicket> {
        self.step_history(|history| history.step_forward().map(str::to_string))
    }

    /// Reload the active tab's current location. History is untouched.
    pub fn refresh(&mut self) -> Option<LoadTicket> {
        let tab_id = self.registry.active_tab_id().to_string();
        self.start_load(&tab_id, None)
    }

    /// Navigate the active tab to the configured home location.
    pub fn home(&mut self) -> Option<LoadTicket> {
        let home = self.config.home_url.clone();
        self.navigate(&home)
    }

    fn step_history<F>(&mut self, step: F) -> Option<LoadTicket>
    where
        F: FnOnce(&mut HistoryStack) -> Option<String>,
    {
        let tab_id = self.registry.active_tab_id().to_string();
        let (_, history) = self.registry.entry_mut(&tab_id)?;

        let Some(location) = step(history) else {
            tracing::debug!(tab_id = %tab_id, "History boundary reached");
            return None;
        };

        self.start_load(&tab_id, Some(location))
    }

    fn start_load(&mut self, tab_id: &str, url: Option<String>) -> Option<LoadTicket> {
        let tab = self.registry.get_mut(tab_id)?;
        let generation = tab.begin_load(url);
        let ticket = LoadTicket {
            tab_id: tab.id.clone(),
            url: tab.url.clone(),
            generation,
        };

        self.persist();
        Some(ticket)
    }

    // === Renderer notifications ===

    pub fn on_load_start(&mut self, ticket: &LoadTicket) -> bool {
        self.apply_load_event(ticket, |tab| tab.load_started(ticket.generation))
    }

    /// The renderer finished loading. `title` is `None` when the content is
    /// not readable (cross-origin); the host name is used instead.
    pub fn on_load_complete(&mut self, ticket: &LoadTicket, title: Option<&str>) -> bool {
        self.apply_load_event(ticket, |tab| tab.load_completed(ticket.generation, title))
    }

    pub fn on_load_error(&mut self, ticket: &LoadTicket) -> bool {
        self.apply_load_event(ticket, |tab| tab.load_failed(ticket.generation))
    }

    fn apply_load_event<F>(&mut self, ticket: &LoadTicket, apply: F) -> bool
    where
        F: FnOnce(&mut Tab) -> bool,
    {
        let applied = self.registry.get_mut(&ticket.tab_id).map_or(false, apply);

        if applied {
            self.persist();
        } else {
            tracing::debug!(
                tab_id = %ticket.tab_id,
                generation = ticket.generation,
                "Discarding stale load notification"
            );
        }

        applied
    }

    /// Title change observed outside of a load completion.
    pub fn set_title(&mut self, tab_id: &str, title: String) -> bool {
        self.update_tab(tab_id, TabUpdate::title(title))
    }

    pub fn set_favicon(&mut self, tab_id: &str, favicon: Option<String>) -> bool {
        self.update_tab(tab_id, TabUpdate::favicon(favicon))
    }

    /// Merge fields into a tab. Updates for closed tabs are ignored.
    pub fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> bool {
        let updated = self.registry.update_tab(tab_id, update);
        if updated {
            self.persist();
        }
        updated
    }

    // === Tab operations ===

    /// Open a blank tab and make it active.
    pub fn new_tab(&mut self) -> String {
        let tab_id = self.registry.create_tab();
        self.registry.select_active(&tab_id);
        self.persist();
        tab_id
    }

    pub fn close_tab(&mut self, tab_id: &str) -> bool {
        let Some((index, tab, history)) = self.registry.close_tab(tab_id) else {
            return false;
        };

        self.recently_closed.push(ClosedTab {
            tab,
            history,
            index,
        });
        let limit = self.config.closed_tab_limit;
        if self.recently_closed.len() > limit {
            let overflow = self.recently_closed.len() - limit;
            self.recently_closed.drain(0..overflow);
        }

        self.persist();
        true
    }

    pub fn close_active_tab(&mut self) -> bool {
        let tab_id = self.registry.active_tab_id().to_string();
        self.close_tab(&tab_id)
    }

    /// Activate a known tab. Unknown ids are ignored.
    pub fn select_tab(&mut self, tab_id: &str) -> bool {
        if !self.registry.contains(tab_id) {
            tracing::debug!(tab_id = %tab_id, "Ignoring selection of unknown tab");
            return false;
        }

        self.registry.select_active(tab_id);
        self.persist();
        true
    }

    pub fn select_next_tab(&mut self) -> bool {
        self.cycle_selection(1)
    }

    pub fn select_previous_tab(&mut self) -> bool {
        let len = self.registry.len();
        self.cycle_selection(len.saturating_sub(1))
    }

    fn cycle_selection(&mut self, offset: usize) -> bool {
        let len = self.registry.len();
        if len == 0 {
            return false;
        }

        let current = self.registry.active_index().unwrap_or(0);
        let target = self.registry.tabs()[(current + offset) % len].id.clone();
        self.select_tab(&target)
    }

    pub fn move_tab(&mut self, tab_id: &str, new_index: usize) -> bool {
        let moved = self.registry.move_tab(tab_id, new_index);
        if moved {
            self.persist();
        }
        moved
    }

    /// Reopen the most recently closed tab at its old position, make it
    /// active and reload its location.
    pub fn restore_closed_tab(&mut self) -> Option<LoadTicket> {
        let closed = self.recently_closed.pop()?;
        let tab_id = self.registry.reopen_tab(closed.index, closed.tab, closed.history);
        self.registry.select_active(&tab_id);
        self.start_load(&tab_id, None)
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) {
        tracing::debug!(shortcut = %shortcut, "Shortcut");

        match shortcut {
            Shortcut::NewTab => {
                self.new_tab();
            }
            Shortcut::CloseTab => {
                self.close_active_tab();
            }
            Shortcut::NextTab => {
                self.select_next_tab();
            }
            Shortcut::PreviousTab => {
                self.select_previous_tab();
            }
        }
    }

    fn persist(&self) {
        self.sessions.persist(&self.registry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tabnest_navigation::{BLANK_LOCATION, FAILED_TITLE};
    use tabnest_session::SessionSnapshot;
    use tabnest_tabs::LoadState;

    fn test_config() -> Config {
        Config::new(PathBuf::from("/tmp/tabnest-test"))
    }

    fn history_of(browser: &Browser) -> Vec<String> {
        browser
            .history(browser.active_tab_id())
            .unwrap()
            .entries()
            .to_vec()
    }

    fn cursor_of(browser: &Browser) -> usize {
        browser.history(browser.active_tab_id()).unwrap().cursor()
    }

    #[test]
    fn test_navigate_then_back() {
        let mut browser = Browser::in_memory(test_config());
        assert_eq!(browser.active_tab().unwrap().url, BLANK_LOCATION);

        let ticket = browser.navigate("example.com").unwrap();
        assert_eq!(ticket.url, "https://example.com");

        let tab = browser.active_tab().unwrap();
        assert_eq!(tab.url, "https://example.com");
        assert!(tab.is_loading());
        assert_eq!(history_of(&browser), vec![BLANK_LOCATION, "https://example.com"]);
        assert_eq!(cursor_of(&browser), 1);

        browser.back().unwrap();
        assert_eq!(browser.active_tab().unwrap().url, BLANK_LOCATION);
        assert_eq!(cursor_of(&browser), 0);
        assert!(!browser.can_go_back());
        assert!(browser.can_go_forward());
    }

    #[test]
    fn test_navigate_after_back_discards_forward_branch() {
        let mut browser = Browser::in_memory(test_config());
        browser.navigate("u1.example").unwrap();
        browser.navigate("u2.example").unwrap();
        browser.back().unwrap();
        browser.navigate("u3.example").unwrap();

        assert_eq!(
            history_of(&browser),
            vec![BLANK_LOCATION, "https://u1.example", "https://u3.example"]
        );
        assert!(!browser.can_go_forward());
        assert!(browser.forward().is_none());
    }

    #[test]
    fn test_history_boundaries_are_noops() {
        let mut browser = Browser::in_memory(test_config());
        let before = browser.active_tab().unwrap().clone();

        assert!(browser.back().is_none());
        assert!(browser.forward().is_none());
        assert_eq!(browser.active_tab().unwrap(), &before);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut browser = Browser::in_memory(test_config());
        assert!(browser.navigate("   ").is_none());
        assert_eq!(history_of(&browser).len(), 1);
    }

    #[test]
    fn test_invalid_address_is_ignored() {
        let mut browser = Browser::in_memory(test_config());
        assert!(browser.navigate("exa mple.com").is_none());
        assert_eq!(history_of(&browser), vec![BLANK_LOCATION]);
        assert!(!browser.active_tab().unwrap().is_loading());
    }

    #[test]
    fn test_outcome_for_idle_tab_is_discarded() {
        let mut browser = Browser::in_memory(test_config());
        let ticket = LoadTicket {
            tab_id: browser.active_tab_id().to_string(),
            url: BLANK_LOCATION.to_string(),
            generation: 0,
        };

        assert!(!browser.on_load_complete(&ticket, Some("Injected")));
        assert!(!browser.on_load_error(&ticket));
        assert_eq!(browser.active_tab().unwrap().title, "New Tab");
    }

    #[test]
    fn test_refresh_keeps_history() {
        let mut browser = Browser::in_memory(test_config());
        let first = browser.navigate("example.com").unwrap();
        browser.on_load_complete(&first, Some("Example"));

        let reload = browser.refresh().unwrap();
        assert!(reload.generation > first.generation);
        assert_eq!(reload.url, "https://example.com");
        assert!(browser.active_tab().unwrap().is_loading());
        assert_eq!(history_of(&browser).len(), 2);
    }

    #[test]
    fn test_home_navigates_to_home_url() {
        let mut browser = Browser::in_memory(test_config());
        browser.navigate("example.com").unwrap();

        let ticket = browser.home().unwrap();
        assert_eq!(ticket.url, BLANK_LOCATION);
        assert_eq!(history_of(&browser).len(), 3);
    }

    #[test]
    fn test_load_complete_sets_title() {
        let mut browser = Browser::in_memory(test_config());
        let ticket = browser.navigate("example.com").unwrap();

        assert!(browser.on_load_start(&ticket));
        assert!(browser.on_load_complete(&ticket, None));

        let tab = browser.active_tab().unwrap();
        assert_eq!(tab.load_state, LoadState::Idle);
        assert_eq!(tab.title, "example.com");
    }

    #[test]
    fn test_load_error_marks_failed_until_refresh() {
        let mut browser = Browser::in_memory(test_config());
        let ticket = browser.navigate("blocked.example").unwrap();

        assert!(browser.on_load_error(&ticket));
        let tab = browser.active_tab().unwrap();
        assert!(tab.is_failed());
        assert_eq!(tab.title, FAILED_TITLE);

        let retry = browser.refresh().unwrap();
        assert!(browser.active_tab().unwrap().is_loading());
        assert!(browser.on_load_complete(&retry, Some("Back online")));
        assert_eq!(browser.active_tab().unwrap().title, "Back online");
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut browser = Browser::in_memory(test_config());
        let slow = browser.navigate("slow.example").unwrap();
        let fast = browser.navigate("fast.example").unwrap();

        assert!(browser.on_load_complete(&fast, Some("Fast")));
        assert!(!browser.on_load_complete(&slow, Some("Slow")));
        assert!(!browser.on_load_error(&slow));

        let tab = browser.active_tab().unwrap();
        assert_eq!(tab.url, "https://fast.example");
        assert_eq!(tab.title, "Fast");
        assert_eq!(tab.load_state, LoadState::Idle);
    }

    #[test]
    fn test_completion_for_closed_tab_is_discarded() {
        let mut browser = Browser::in_memory(test_config());
        browser.new_tab();
        let ticket = browser.navigate("example.com").unwrap();
        browser.close_tab(&ticket.tab_id);

        assert!(!browser.on_load_complete(&ticket, Some("Gone")));
        assert!(!browser.set_title(&ticket.tab_id, "Gone".to_string()));
        assert!(browser.tab(&ticket.tab_id).is_none());
    }

    #[test]
    fn test_close_active_tab_activates_last() {
        let mut browser = Browser::in_memory(test_config());
        let a = browser.active_tab_id().to_string();
        let b = browser.new_tab();
        let c = browser.new_tab();
        browser.select_tab(&b);

        assert!(browser.close_tab(&b));
        let ids: Vec<&str> = browser.tabs().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);
        assert_eq!(browser.active_tab_id(), c);
    }

    #[test]
    fn test_close_only_tab_leaves_one_idle_tab() {
        let mut browser = Browser::in_memory(test_config());
        browser.navigate("example.com").unwrap();

        assert!(browser.close_active_tab());
        assert_eq!(browser.tabs().len(), 1);

        let tab = browser.active_tab().unwrap();
        assert!(!tab.is_loading());
        assert_eq!(tab.url, BLANK_LOCATION);
    }

    #[test]
    fn test_select_unknown_tab_is_ignored() {
        let mut browser = Browser::in_memory(test_config());
        let active = browser.active_tab_id().to_string();

        assert!(!browser.select_tab("nope"));
        assert_eq!(browser.active_tab_id(), active);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut browser = Browser::in_memory(test_config());
        let a = browser.active_tab_id().to_string();
        let b = browser.new_tab();
        let c = browser.new_tab();

        browser.handle_shortcut(Shortcut::NextTab);
        assert_eq!(browser.active_tab_id(), a);

        browser.handle_shortcut(Shortcut::PreviousTab);
        assert_eq!(browser.active_tab_id(), c);

        browser.handle_shortcut(Shortcut::PreviousTab);
        assert_eq!(browser.active_tab_id(), b);
    }

    #[test]
    fn test_shortcuts_open_and_close() {
        let mut browser = Browser::in_memory(test_config());
        browser.handle_shortcut(Shortcut::NewTab);
        assert_eq!(browser.tabs().len(), 2);

        let newest = browser.tabs()[1].id.clone();
        assert_eq!(browser.active_tab_id(), newest);

        browser.handle_shortcut(Shortcut::CloseTab);
        assert_eq!(browser.tabs().len(), 1);
        assert!(browser.tab(&newest).is_none());
    }

    #[test]
    fn test_histories_are_per_tab() {
        let mut browser = Browser::in_memory(test_config());
        let first = browser.active_tab_id().to_string();
        browser.navigate("one.example").unwrap();

        browser.new_tab();
        assert!(!browser.can_go_back());
        browser.navigate("two.example").unwrap();

        browser.select_tab(&first);
        browser.back().unwrap();
        assert_eq!(browser.tab(&first).unwrap().url, BLANK_LOCATION);
        assert_eq!(history_of(&browser).len(), 2);
    }

    #[test]
    fn test_restore_closed_tab() {
        let mut browser = Browser::in_memory(test_config());
        browser.new_tab();
        browser.navigate("example.com").unwrap();
        let closed_id = browser.active_tab_id().to_string();
        browser.close_tab(&closed_id);
        assert_eq!(browser.closed_tab_count(), 1);

        let ticket = browser.restore_closed_tab().unwrap();
        assert_ne!(ticket.tab_id, closed_id);
        assert_eq!(ticket.url, "https://example.com");
        assert_eq!(browser.active_tab_id(), ticket.tab_id);
        assert_eq!(browser.tabs().len(), 2);
        assert!(browser.can_go_back());

        assert!(browser.restore_closed_tab().is_none());
    }

    #[test]
    fn test_closed_tab_stack_is_capped() {
        let mut config = test_config();
        config.closed_tab_limit = 2;
        let mut browser = Browser::in_memory(config);

        for _ in 0..4 {
            browser.new_tab();
            browser.close_active_tab();
        }
        assert_eq!(browser.closed_tab_count(), 2);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let store = MemoryStore::new();
        let sessions = SessionStore::new(Arc::new(store.clone()), "browser");
        let mut browser = Browser::with_store(test_config(), Arc::new(store));

        let tab_id = browser.new_tab();
        browser.navigate("example.com").unwrap();

        let snapshot = sessions.load_snapshot();
        assert_eq!(snapshot.active_tab_id, tab_id);
        assert_eq!(snapshot.tabs.len(), 2);
        assert!(snapshot.tabs[1].is_loading);
        assert_eq!(snapshot.history_index[&tab_id], 1);
    }

    #[test]
    fn test_session_survives_reload() {
        let store = MemoryStore::new();
        let tab_id = {
            let mut browser = Browser::with_store(test_config(), Arc::new(store.clone()));
            let tab_id = browser.new_tab();
            browser.navigate("example.com").unwrap();
            browser.navigate("rust-lang.org").unwrap();
            browser.back().unwrap();
            tab_id
        };

        let mut reloaded = Browser::with_store(test_config(), Arc::new(store));
        assert_eq!(reloaded.tabs().len(), 2);
        assert_eq!(reloaded.active_tab_id(), tab_id);

        let tab = reloaded.active_tab().unwrap();
        assert_eq!(tab.url, "https://example.com");
        assert!(!tab.is_loading());

        // Forward branch survives the reload
        let ticket = reloaded.forward().unwrap();
        assert_eq!(ticket.url, "https://rust-lang.org");
        assert_ne!(reloaded.new_tab(), tab_id);
    }

    #[test]
    fn test_corrupt_storage_is_healed_on_start() {
        let store = MemoryStore::new();
        store.set("browser.tabs", "{\"broken\": true}").unwrap();

        let browser = Browser::with_store(test_config(), Arc::new(store.clone()));
        assert_eq!(browser.tabs().len(), 1);

        let snapshot = SessionStore::new(Arc::new(store), "browser").load_snapshot();
        assert_eq!(snapshot, SessionSnapshot::capture(browser.registry()));
    }
}
