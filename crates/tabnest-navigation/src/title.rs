//! Fallback titles for content the renderer cannot inspect

use url::Url;

pub const NEW_TAB_TITLE: &str = "New Tab";
pub const FAILED_TITLE: &str = "Failed to load";
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Title to show when the page title is unreadable: the host name, or
/// [`UNKNOWN_TITLE`] when the location has none.
pub fn fallback_title(location: &str) -> String {
    Url::parse(location)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}
