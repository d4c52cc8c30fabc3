//! Per-tab load state machine
//!
//! ```text
//!            navigate / back / forward / refresh
//!   Idle ─────────────────────────────────────────▶ Loading
//!    ▲                                               │  │
//!    └──────────────── load complete ────────────────┘  │
//!                                                       ▼
//!   Failed ◀─────────────── load error ─────────────────┘
//! ```
//!
//! `Failed` is left only by starting a new load.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Content settled (or nothing requested yet)
    Idle,
    /// A load was requested and has not reported back
    Loading,
    /// The last load reported an error
    Failed,
}

impl LoadState {
    pub fn can_transition_to(&self, target: LoadState) -> bool {
        match (self, target) {
            // Any state may start a new load, including a reload mid-load
            (_, LoadState::Loading) => true,
            (LoadState::Loading, LoadState::Idle) => true,
            (LoadState::Loading, LoadState::Failed) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Failed => "failed",
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(LoadState::Idle),
            "loading" => Ok(LoadState::Loading),
            "failed" => Ok(LoadState::Failed),
            _ => Err(format!("Unknown load state: {}", s)),
        }
    }
}
