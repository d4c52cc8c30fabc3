//! Tabnest Session Persistence
//!
//! The session (tabs, active tab, per-tab history) is mirrored to a
//! key-value store as four independent slices after every mutation:
//!
//! | key                  | shape                                   |
//! |----------------------|-----------------------------------------|
//! | `<ns>.tabs`          | `[{id, url, title, isLoading, favicon?}]` |
//! | `<ns>.activeTabId`   | `"id"`                                  |
//! | `<ns>.history`       | `{id: [url, ...]}`                      |
//! | `<ns>.historyIndex`  | `{id: n}`                               |
//!
//! Restore validates each slice on its own. A malformed slice is replaced
//! by its default instead of failing startup.

mod error;
mod keys;
mod snapshot;
mod store;

pub use error::SessionError;
pub use keys::{SessionKeys, DEFAULT_NAMESPACE};
pub use snapshot::{PersistedTab, SessionSnapshot};
pub use store::SessionStore;

pub type Result<T> = std::result::Result<T, SessionError>;
