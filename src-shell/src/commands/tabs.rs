//! Tab management commands

use serde::{Deserialize, Serialize};
use tabnest_core::{LoadTicket, Shortcut, Tab};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: String,
    pub url: String,
    pub title: String,
    pub favicon_url: Option<String>,
    pub state: String,
    pub is_loading: bool,
    pub is_active: bool,
}

impl TabInfo {
    fn new(tab: &Tab, active_tab_id: &str) -> Self {
        Self {
            id: tab.id.clone(),
            url: tab.url.clone(),
            title: tab.display_title().to_string(),
            favicon_url: tab.favicon.clone(),
            state: tab.load_state.as_str().to_string(),
            is_loading: tab.is_loading(),
            is_active: tab.id == active_tab_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

fn tab_info(state: &AppState, tab_id: &str) -> CommandResult<TabInfo> {
    state.with_browser(|browser| match browser.tab(tab_id) {
        Some(tab) => CommandResult::ok(TabInfo::new(tab, browser.active_tab_id())),
        None => CommandResult::err(format!("Tab not found: {tab_id}")),
    })
}

pub fn get_tabs(state: &AppState) -> CommandResult<Vec<TabInfo>> {
    state.with_browser(|browser| {
        let active = browser.active_tab_id();
        CommandResult::ok(
            browser
                .tabs()
                .iter()
                .map(|tab| TabInfo::new(tab, active))
                .collect(),
        )
    })
}

pub fn get_active_tab(state: &AppState) -> CommandResult<TabInfo> {
    let tab_id = state.with_browser(|browser| browser.active_tab_id().to_string());
    tab_info(state, &tab_id)
}

pub fn create_tab(state: &AppState) -> CommandResult<TabInfo> {
    let tab_id = state.with_browser_mut(|browser| browser.new_tab());
    tab_info(state, &tab_id)
}

/// Close `tab_id`, or the active tab when no id is given. Returns the tabs left.
pub fn close_tab(state: &AppState, tab_id: Option<String>) -> CommandResult<Vec<TabInfo>> {
    let closed = state.with_renderer(|renderer, browser| {
        let closed = match tab_id {
            Some(tab_id) => browser.close_tab(&tab_id),
            None => browser.close_active_tab(),
        };
        renderer.prune(browser);
        closed
    });

    if !closed {
        return CommandResult::err("Tab not found");
    }
    get_tabs(state)
}

pub fn activate_tab(state: &AppState, tab_id: String) -> CommandResult<TabInfo> {
    if !state.with_browser_mut(|browser| browser.select_tab(&tab_id)) {
        return CommandResult::err(format!("Tab not found: {tab_id}"));
    }
    tab_info(state, &tab_id)
}

pub fn reorder_tab(state: &AppState, tab_id: String, new_index: usize) -> CommandResult<Vec<TabInfo>> {
    if !state.with_browser_mut(|browser| browser.move_tab(&tab_id, new_index)) {
        return CommandResult::err(format!("Tab not found: {tab_id}"));
    }
    get_tabs(state)
}

pub fn restore_last_closed_tab(state: &AppState) -> CommandResult<LoadTicket> {
    let ticket = state.with_renderer(|renderer, browser| {
        browser
            .restore_closed_tab()
            .map(|ticket| renderer.load(browser, ticket))
    });

    match ticket {
        Some(ticket) => CommandResult::ok(ticket),
        None => CommandResult::err("No recently closed tabs"),
    }
}

pub fn set_tab_title(state: &AppState, tab_id: String, title: String) -> CommandResult<TabInfo> {
    if !state.with_browser_mut(|browser| browser.set_title(&tab_id, title)) {
        return CommandResult::err(format!("Tab not found: {tab_id}"));
    }
    tab_info(state, &tab_id)
}

pub fn set_tab_favicon(
    state: &AppState,
    tab_id: String,
    favicon_url: Option<String>,
) -> CommandResult<TabInfo> {
    if !state.with_browser_mut(|browser| browser.set_favicon(&tab_id, favicon_url)) {
        return CommandResult::err(format!("Tab not found: {tab_id}"));
    }
    tab_info(state, &tab_id)
}

/// Run a keyboard shortcut and report the tab that ends up active.
pub fn handle_shortcut(state: &AppState, binding: String) -> CommandResult<TabInfo> {
    let Some(shortcut) = Shortcut::parse(&binding) else {
        return CommandResult::err(format!("Unknown shortcut: {binding}"));
    };

    state.with_renderer(|renderer, browser| {
        browser.handle_shortcut(shortcut);
        renderer.prune(browser);
    });
    get_active_tab(state)
}
