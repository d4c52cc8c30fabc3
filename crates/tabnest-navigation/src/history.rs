//! Per-tab history stack
//!
//! ```text
//! entries: [about:blank, a, b, c]
//!                           ^ cursor
//! push(d)  -> [about:blank, a, b, d]   (c is discarded)
//! ```
//!
//! Invariant: `entries` is never empty and `cursor < entries.len()`.

use crate::error::NavigationError;
use crate::{Result, BLANK_LOCATION};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryStack {
    /// A history seeded with the blank location.
    pub fn new() -> Self {
        Self::seeded(BLANK_LOCATION)
    }

    /// A history with a single entry.
    pub fn seeded(location: impl Into<String>) -> Self {
        Self {
            entries: vec![location.into()],
            cursor: 0,
        }
    }

    /// Rebuild a history from stored parts, rejecting shapes that break the invariant.
    pub fn from_parts(entries: Vec<String>, cursor: usize) -> Result<Self> {
        if entries.is_empty() {
            return Err(NavigationError::EmptyHistory);
        }
        if cursor >= entries.len() {
            return Err(NavigationError::CursorOutOfRange {
                cursor,
                len: entries.len(),
            });
        }

        Ok(Self { entries, cursor })
    }

    /// Like [`HistoryStack::from_parts`] but clamps the cursor to the last entry.
    pub fn from_parts_clamped(entries: Vec<String>, cursor: usize) -> Result<Self> {
        let last = entries.len().checked_sub(1).ok_or(NavigationError::EmptyHistory)?;
        Self::from_parts(entries, cursor.min(last))
    }

    /// Truncate everything after the cursor, append `location`, move to it.
    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location.into());
        self.cursor = self.entries.len() - 1;
    }

    /// Step one entry back. `None` at the first entry.
    pub fn step_back(&mut self) -> Option<&str> {
        if !self.can_step_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step one entry forward. `None` at the last entry.
    pub fn step_forward(&mut self) -> Option<&str> {
        if !self.can_step_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}
