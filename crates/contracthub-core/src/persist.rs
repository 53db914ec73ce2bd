//! The key-value capability that collections are loaded from and saved to.
//!
//! Each collection is stored whole, as a JSON array, under a fixed key.
//! Writes always replace the full collection.

use std::{collections::HashMap, convert::Infallible};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

pub const BLUEPRINTS_KEY: &str = "contracthub_blueprints";
pub const CONTRACTS_KEY: &str = "contracthub_contracts";

/// Abstraction over a string key-value backend.
///
/// Implemented by storage crates (e.g. `contracthub-store-sqlite`) and by
/// [`MemoryStore`] for tests.
pub trait KeyValueStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The value stored under `key`, or `None` if nothing has been stored.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

pub(crate) fn backend<E>(err: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Backend(Box::new(err))
}

/// Decode a stored collection.
///
/// The value must be a JSON array, or the whole collection is reported as
/// corrupt. Elements that fail to decode are logged and skipped; the rest
/// are kept in stored order.
pub fn decode_collection<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Vec<T>> {
  let records: Vec<serde_json::Value> =
    serde_json::from_str(raw).map_err(|source| Error::StorageCorrupt {
      key: key.to_owned(),
      source,
    })?;
  let total = records.len();
  let items: Vec<T> = records
    .into_iter()
    .enumerate()
    .filter_map(|(index, record)| match serde_json::from_value(record) {
      Ok(item) => Some(item),
      Err(err) => {
        tracing::warn!(key, index, %err, "skipping unreadable stored record");
        None
      }
    })
    .collect();
  if items.len() < total {
    tracing::warn!(key, kept = items.len(), total, "stored collection partially read");
  }
  Ok(items)
}

/// Read the collection under `key`.
///
/// Returns `Ok(None)` when the key is absent or its value is not a JSON
/// array; such a value is logged and discarded. Unreadable elements of an
/// array are dropped individually. Only a failing backend produces an error.
pub fn read_collection<T, K>(store: &K, key: &str) -> Result<Option<Vec<T>>>
where
  T: DeserializeOwned,
  K: KeyValueStore + ?Sized,
{
  let Some(raw) = store.get(key).map_err(backend)? else {
    return Ok(None);
  };
  match decode_collection(key, &raw) {
    Ok(items) => Ok(Some(items)),
    Err(err) => {
      tracing::warn!(%err, "discarding stored collection");
      Ok(None)
    }
  }
}

/// Serialise `items` as a JSON array and store it under `key`.
pub fn write_collection<T, K>(store: &mut K, key: &str, items: &[T]) -> Result<()>
where
  T: Serialize,
  K: KeyValueStore + ?Sized,
{
  let json = serde_json::to_string(items)?;
  store.set(key, &json).map_err(backend)
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A [`KeyValueStore`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store pre-populated with a single entry.
  pub fn with(key: &str, value: &str) -> Self {
    let mut store = Self::new();
    store.entries.insert(key.to_owned(), value.to_owned());
    store
  }

  pub fn raw(&self, key: &str) -> Option<&str> {
    self.entries.get(key).map(String::as_str)
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), Infallible> {
    self.entries.insert(key.to_owned(), value.to_owned());
    Ok(())
  }
}
