//! Shell command surface
//!
//! Each request is a JSON object tagged by `command`; the reply is a
//! serialized `CommandResult`.

pub mod navigation;
pub mod tabs;

use serde::Deserialize;
use serde_json::Value;

use crate::state::AppState;
pub use tabs::CommandResult;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    GetTabs,
    GetActiveTab,
    CreateTab,
    CloseTab {
        #[serde(default)]
        tab_id: Option<String>,
    },
    ActivateTab {
        tab_id: String,
    },
    ReorderTab {
        tab_id: String,
        new_index: usize,
    },
    RestoreLastClosedTab,
    SetTabTitle {
        tab_id: String,
        title: String,
    },
    SetTabFavicon {
        tab_id: String,
        #[serde(default)]
        favicon_url: Option<String>,
    },
    Shortcut {
        binding: String,
    },
    Navigate {
        url: String,
    },
    Back,
    Forward,
    Refresh,
    Home,
    LoadComplete {
        tab_id: String,
        #[serde(default)]
        generation: Option<u64>,
        #[serde(default)]
        title: Option<String>,
    },
    LoadError {
        tab_id: String,
        #[serde(default)]
        generation: Option<u64>,
    },
    GetNavigationState,
    GetHistory {
        #[serde(default)]
        tab_id: Option<String>,
    },
}

fn reply<T: serde::Serialize>(result: CommandResult<T>) -> Value {
    serde_json::to_value(result).unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "data": null, "error": e.to_string() })
    })
}

pub fn dispatch(state: &AppState, request: Request) -> Value {
    tracing::debug!(?request, "Dispatching command");

    match request {
        Request::GetTabs => reply(tabs::get_tabs(state)),
        Request::GetActiveTab => reply(tabs::get_active_tab(state)),
        Request::CreateTab => reply(tabs::create_tab(state)),
        Request::CloseTab { tab_id } => reply(tabs::close_tab(state, tab_id)),
        Request::ActivateTab { tab_id } => reply(tabs::activate_tab(state, tab_id)),
        Request::ReorderTab { tab_id, new_index } => {
            reply(tabs::reorder_tab(state, tab_id, new_index))
        }
        Request::RestoreLastClosedTab => reply(tabs::restore_last_closed_tab(state)),
        Request::SetTabTitle { tab_id, title } => reply(tabs::set_tab_title(state, tab_id, title)),
        Request::SetTabFavicon {
            tab_id,
            favicon_url,
        } => reply(tabs::set_tab_favicon(state, tab_id, favicon_url)),
        Request::Shortcut { binding } => reply(tabs::handle_shortcut(state, binding)),
        Request::Navigate { url } => reply(navigation::navigate(state, url)),
        Request::Back => reply(navigation::go_back(state)),
        Request::Forward => reply(navigation::go_forward(state)),
        Request::Refresh => reply(navigation::refresh(state)),
        Request::Home => reply(navigation::go_home(state)),
        Request::LoadComplete {
            tab_id,
            generation,
            title,
        } => reply(navigation::load_complete(state, tab_id, generation, title)),
        Request::LoadError { tab_id, generation } => {
            reply(navigation::load_error(state, tab_id, generation))
        }
        Request::GetNavigationState => reply(navigation::get_navigation_state(state)),
        Request::GetHistory { tab_id } => reply(navigation::get_history(state, tab_id)),
    }
}

/// Parse one request line and dispatch it. Malformed requests are answered
/// with an error result.
pub fn handle_line(state: &AppState, line: &str) -> Value {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(state, request),
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting malformed request");
            reply(CommandResult::<()>::err(format!("Invalid request: {e}")))
        }
    }
}
