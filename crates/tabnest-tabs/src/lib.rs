//! Tabnest Tab Management
//!
//! The registry owns every tab, the history stack of each tab, and the
//! active selection. A registry is never observably empty: closing the last
//! tab synthesizes a fresh blank one.

mod error;
mod id;
mod registry;
mod state;
mod tab;

pub use error::TabError;
pub use id::TabIdGenerator;
pub use registry::TabRegistry;
pub use state::LoadState;
pub use tab::{Tab, TabUpdate};

pub type Result<T> = std::result::Result<T, TabError>;
