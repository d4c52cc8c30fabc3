//! Keyboard shortcuts
//!
//! - `Ctrl+T`: new tab
//! - `Ctrl+W`: close the active tab
//! - `Ctrl+Tab` / `Ctrl+PageDown`: next tab (wraps)
//! - `Ctrl+Shift+Tab` / `Ctrl+PageUp`: previous tab (wraps)
//!
//! `Cmd` and `Meta` are accepted in place of `Ctrl`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    NewTab,
    CloseTab,
    NextTab,
    PreviousTab,
}

impl Shortcut {
    /// Parse a key binding such as `ctrl+shift+tab`. Case and spacing are ignored.
    pub fn parse(binding: &str) -> Option<Self> {
        let normalized: String = binding
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        let mut parts: Vec<&str> = normalized.split('+').collect();
        let key = parts.pop()?;
        let mut primary = false;
        let mut shift = false;
        for modifier in parts {
            match modifier {
                "ctrl" | "control" | "cmd" | "meta" => primary = true,
                "shift" => shift = true,
                _ => return None,
            }
        }

        if !primary {
            return None;
        }

        match (key, shift) {
            ("t", false) => Some(Shortcut::NewTab),
            ("w", false) => Some(Shortcut::CloseTab),
            ("tab", false) | ("pagedown", false) => Some(Shortcut::NextTab),
            ("tab", true) | ("pageup", false) => Some(Shortcut::PreviousTab),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shortcut::NewTab => "new_tab",
            Shortcut::CloseTab => "close_tab",
            Shortcut::NextTab => "next_tab",
            Shortcut::PreviousTab => "previous_tab",
        }
    }
}

impl std::fmt::Display for Shortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
