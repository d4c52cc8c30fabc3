//! Tabnest Navigation
//!
//! - History stack: ordered visited locations plus a cursor, one per tab
//! - Address input normalization: bare hosts get a default scheme
//! - Title fallback for content whose title cannot be read

mod error;
mod history;
mod input;
mod title;

pub use error::NavigationError;
pub use history::HistoryStack;
pub use input::{normalize_location, DEFAULT_SCHEME};
pub use title::{fallback_title, FAILED_TITLE, NEW_TAB_TITLE, UNKNOWN_TITLE};

/// The blank start location every fresh tab and history is seeded with.
pub const BLANK_LOCATION: &str = "about:blank";

pub type Result<T> = std::result::Result<T, NavigationError>;
