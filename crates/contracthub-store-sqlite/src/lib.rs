//! SQLite backend for ContractHub.
//!
//! Implements [`contracthub_core::persist::KeyValueStore`] over a single
//! table, so a whole hub lives in one file.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
