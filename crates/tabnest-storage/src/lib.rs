//! Tabnest Storage Layer
//!
//! A dumb get/set/remove store for JSON values under string keys.
//! Callers own validation; reads tolerate missing and corrupt values by
//! handing back the caller's default.

mod database;
mod error;
mod memory;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStore;
pub use store::{JsonStoreExt, KeyValueStore};

pub type Result<T> = std::result::Result<T, StorageError>;
