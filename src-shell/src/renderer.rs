//! Headless stand-in for the embedded-frame renderer
//!
//! Local `about:` pages are rendered in-process and complete immediately.
//! Remote loads stay pending until the client reports an outcome, which
//! lets a driver script replay late or out-of-order completions.

use std::collections::HashMap;

use tabnest_core::{Browser, LoadTicket, NEW_TAB_TITLE};

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Latest outstanding ticket per tab
    pending: HashMap<String, LoadTicket>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take over a freshly issued ticket.
    pub fn load(&mut self, browser: &mut Browser, ticket: LoadTicket) -> LoadTicket {
        browser.on_load_start(&ticket);

        if is_local(&ticket.url) {
            self.pending.remove(&ticket.tab_id);
            browser.on_load_complete(&ticket, Some(NEW_TAB_TITLE));
        } else {
            self.pending.insert(ticket.tab_id.clone(), ticket.clone());
        }

        ticket
    }

    pub fn pending(&self, tab_id: &str) -> Option<&LoadTicket> {
        self.pending.get(tab_id)
    }

    /// Drop outstanding tickets for tabs that no longer exist.
    pub fn prune(&mut self, browser: &Browser) {
        self.pending.retain(|tab_id, _| browser.tab(tab_id).is_some());
    }

    /// Report a finished load. Without an explicit generation the tab's
    /// outstanding ticket is used.
    pub fn complete(
        &mut self,
        browser: &mut Browser,
        tab_id: &str,
        generation: Option<u64>,
        title: Option<&str>,
    ) -> bool {
        match self.resolve(tab_id, generation) {
            Some(ticket) => browser.on_load_complete(&ticket, title),
            None => false,
        }
    }

    pub fn fail(&mut self, browser: &mut Browser, tab_id: &str, generation: Option<u64>) -> bool {
        match self.resolve(tab_id, generation) {
            Some(ticket) => browser.on_load_error(&ticket),
            None => false,
        }
    }

    fn resolve(&mut self, tab_id: &str, generation: Option<u64>) -> Option<LoadTicket> {
        let pending_generation = self.pending.get(tab_id).map(|t| t.generation);

        match generation {
            Some(generation) if pending_generation != Some(generation) => Some(LoadTicket {
                tab_id: tab_id.to_string(),
                url: String::new(),
                generation,
            }),
            _ => self.pending.remove(tab_id),
        }
    }
}

fn is_local(url: &str) -> bool {
    url.to_ascii_lowercase().starts_with("about:")
}
