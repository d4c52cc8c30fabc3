//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("History has no entries")]
    EmptyHistory,

    #[error("History cursor {cursor} out of range for {len} entries")]
    CursorOutOfRange { cursor: usize, len: usize },
}
