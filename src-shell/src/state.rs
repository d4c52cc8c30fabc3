//! Application state management

use parking_lot::RwLock;
use std::sync::Arc;

use tabnest_core::{Browser, Config, Result};

use crate::renderer::HeadlessRenderer;

/// Shared application state
pub struct AppState {
    browser: Arc<RwLock<Browser>>,
    renderer: Arc<RwLock<HeadlessRenderer>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::from_browser(Browser::open(config)?))
    }

    pub fn in_memory(config: Config) -> Self {
        Self::from_browser(Browser::in_memory(config))
    }

    fn from_browser(browser: Browser) -> Self {
        Self {
            browser: Arc::new(RwLock::new(browser)),
            renderer: Arc::new(RwLock::new(HeadlessRenderer::new())),
        }
    }

    pub fn with_browser<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Browser) -> T,
    {
        f(&self.browser.read())
    }

    pub fn with_browser_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Browser) -> T,
    {
        f(&mut self.browser.write())
    }

    /// Run against both the browser and the renderer, e.g. to hand a fresh
    /// load ticket to the renderer.
    pub fn with_renderer<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut HeadlessRenderer, &mut Browser) -> T,
    {
        let mut browser = self.browser.write();
        let mut renderer = self.renderer.write();
        f(&mut renderer, &mut browser)
    }
}
