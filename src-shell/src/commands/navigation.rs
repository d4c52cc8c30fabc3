//! Navigation commands

use serde::Serialize;
use tabnest_core::{Browser, LoadTicket};

use super::tabs::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NavigationInfo {
    pub tab_id: String,
    pub url: String,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl NavigationInfo {
    fn of_active(browser: &Browser) -> Option<Self> {
        let tab = browser.active_tab()?;
        Some(Self {
            tab_id: tab.id.clone(),
            url: tab.url.clone(),
            is_loading: tab.is_loading(),
            can_go_back: browser.can_go_back(),
            can_go_forward: browser.can_go_forward(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryInfo {
    pub tab_id: String,
    pub entries: Vec<String>,
    pub cursor: usize,
}

fn start<F>(state: &AppState, issue: F) -> CommandResult<Option<LoadTicket>>
where
    F: FnOnce(&mut Browser) -> Option<LoadTicket>,
{
    let ticket = state.with_renderer(|renderer, browser| {
        issue(browser).map(|ticket| renderer.load(browser, ticket))
    });
    CommandResult::ok(ticket)
}

/// Navigate the active tab. Blank input answers with no ticket.
pub fn navigate(state: &AppState, url: String) -> CommandResult<Option<LoadTicket>> {
    start(state, |browser| browser.navigate(&url))
}

pub fn go_back(state: &AppState) -> CommandResult<Option<LoadTicket>> {
    start(state, Browser::back)
}

pub fn go_forward(state: &AppState) -> CommandResult<Option<LoadTicket>> {
    start(state, Browser::forward)
}

pub fn refresh(state: &AppState) -> CommandResult<Option<LoadTicket>> {
    start(state, Browser::refresh)
}

pub fn go_home(state: &AppState) -> CommandResult<Option<LoadTicket>> {
    start(state, Browser::home)
}

pub fn load_complete(
    state: &AppState,
    tab_id: String,
    generation: Option<u64>,
    title: Option<String>,
) -> CommandResult<bool> {
    CommandResult::ok(state.with_renderer(|renderer, browser| {
        renderer.complete(browser, &tab_id, generation, title.as_deref())
    }))
}

pub fn load_error(state: &AppState, tab_id: String, generation: Option<u64>) -> CommandResult<bool> {
    CommandResult::ok(
        state.with_renderer(|renderer, browser| renderer.fail(browser, &tab_id, generation)),
    )
}

pub fn get_navigation_state(state: &AppState) -> CommandResult<NavigationInfo> {
    match state.with_browser(NavigationInfo::of_active) {
        Some(info) => CommandResult::ok(info),
        None => CommandResult::err("No active tab"),
    }
}

/// History of `tab_id`, or of the active tab.
pub fn get_history(state: &AppState, tab_id: Option<String>) -> CommandResult<HistoryInfo> {
    state.with_browser(|browser| {
        let tab_id = tab_id.unwrap_or_else(|| browser.active_tab_id().to_string());
        match browser.history(&tab_id) {
            Some(history) => CommandResult::ok(HistoryInfo {
                entries: history.entries().to_vec(),
                cursor: history.cursor(),
                tab_id,
            }),
            None => CommandResult::err(format!("Tab not found: {tab_id}")),
        }
    })
}
