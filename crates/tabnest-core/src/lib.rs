//! Tabnest Core
//!
//! Central coordination layer: the [`Browser`] owns the tab registry and
//! drives every navigation. Rendering is external; the renderer is handed a
//! [`LoadTicket`] per load and reports back with it.

mod browser;
mod config;
mod error;
mod shortcuts;

pub use browser::{Browser, LoadTicket};
pub use config::Config;
pub use error::CoreError;
pub use shortcuts::Shortcut;

// Re-export core components
pub use tabnest_navigation::{
    fallback_title, normalize_location, HistoryStack, NavigationError, BLANK_LOCATION,
    FAILED_TITLE, NEW_TAB_TITLE,
};
pub use tabnest_session::{PersistedTab, SessionError, SessionSnapshot, SessionStore};
pub use tabnest_storage::{Database, JsonStoreExt, KeyValueStore, MemoryStore, StorageError};
pub use tabnest_tabs::{LoadState, Tab, TabRegistry, TabUpdate};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
