//! Core types and operations for ContractHub.
//!
//! Blueprints (named field schemas) live in the [`catalog::TemplateCatalog`];
//! contracts built from them live in the [`workflow::WorkflowEngine`] and move
//! through a fixed status table. Both collections are owned by a [`Hub`],
//! which loads from and saves to any [`persist::KeyValueStore`].
//!
//! This crate performs no I/O of its own. Storage backends (e.g.
//! `contracthub-store-sqlite`) implement the key-value trait.

pub mod blueprint;
pub mod catalog;
pub mod contract;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod field;
pub mod hub;
pub mod id;
pub mod persist;
pub mod render;
pub mod seed;
pub mod session;
pub mod status;
pub mod workflow;

pub use error::{Error, Result, ValidationError};
pub use hub::Hub;
pub use session::Session;
