//! [`SqliteStore`], the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use chrono::Utc;
use contracthub_core::persist::KeyValueStore;
use rusqlite::{Connection, OptionalExtension as _};

use crate::{
  Error, Result,
  schema::{SCHEMA, SCHEMA_VERSION},
};

/// A key-value store backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening sqlite store");
    let conn = Connection::open(path)?;
    Self::init(conn)
  }

  /// Open an in-memory store, for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    let found: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if found > SCHEMA_VERSION {
      return Err(Error::SchemaVersion { found, supported: SCHEMA_VERSION });
    }
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn })
  }

  /// Every stored key, in sorted order.
  pub fn keys(&self) -> Result<Vec<String>> {
    let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStore {
  type Error = Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn
      .query_row(
        "SELECT value FROM kv WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    let at = Utc::now().to_rfc3339();
    self.conn.execute(
      "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
       ON CONFLICT(key) DO UPDATE SET
         value      = excluded.value,
         updated_at = excluded.updated_at",
      rusqlite::params![key, value, at],
    )?;
    tracing::trace!(key, bytes = value.len(), "stored value");
    Ok(())
  }
}
