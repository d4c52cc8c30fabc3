//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tabnest_navigation::{BLANK_LOCATION, DEFAULT_SCHEME};
use tabnest_session::DEFAULT_NAMESPACE;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Prefix for the persisted session keys
    pub storage_namespace: String,
    /// Location the home action navigates to
    pub home_url: String,
    /// Scheme prepended to address input that has none
    pub default_scheme: String,
    /// How many closed tabs can be reopened
    pub closed_tab_limit: usize,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tabnest.db"),
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            home_url: BLANK_LOCATION.to_string(),
            default_scheme: DEFAULT_SCHEME.to_string(),
            closed_tab_limit: 20,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("tabnest"))
            .unwrap_or_else(|| PathBuf::from(".tabnest"))
    }

    /// Parse a JSON config file. Fields left out take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Like [`Config::from_file`], but a missing or unreadable file yields defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid config file");
                Self::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
