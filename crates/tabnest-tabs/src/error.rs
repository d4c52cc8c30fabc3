//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TabError {
    #[error("Invalid load state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
