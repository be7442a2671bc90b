//! SQLite-backed, origin-scoped key-value store.
//!
//! # Responsibility
//! - Persist string entries in `kv_entries` partitioned by origin.
//! - Enforce the per-origin quota inside the write transaction.
//!
//! # Invariants
//! - Reads and writes never touch rows of another origin.
//! - The connection must have migrations applied (see `db::open_db`).

use super::{check_quota, entry_units, KeyValueStore, StoreResult};
use crate::config::StoreConfig;
use crate::db::ensure_store_schema;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable store bound to one origin on a migrated connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
    origin: String,
    quota_units: Option<usize>,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Binds a store to `conn` after verifying the schema is present.
    pub fn try_new(conn: &'conn Connection, config: &StoreConfig) -> StoreResult<Self> {
        if let Err(err) = ensure_store_schema(conn) {
            warn!("event=store_open module=store status=error error={err}");
            return Err(err.into());
        }

        Ok(Self {
            conn,
            origin: config.origin.clone(),
            quota_units: config.quota_units,
        })
    }

    /// Origin this store reads and writes.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn stored_usage(&self) -> StoreResult<usize> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kv_entries WHERE origin = ?1;")?;
        let mut rows = stmt.query([self.origin.as_str()])?;
        let mut usage = 0;
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let value: String = row.get(1)?;
            usage += entry_units(&key, &value);
        }
        Ok(usage)
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE origin = ?1 AND key = ?2;",
                params![self.origin, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let previous = self.get(key)?;
        let usage = self.stored_usage()?;
        if let Err(err) = check_quota(self.quota_units, usage, key, previous.as_deref(), value) {
            warn!(
                "event=kv_set module=store status=rejected origin={} key={} error={}",
                self.origin, key, err
            );
            return Err(err);
        }

        tx.execute(
            "INSERT INTO kv_entries (origin, key, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(origin, key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.origin, key, value],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM kv_entries WHERE origin = ?1 AND key = ?2;",
            params![self.origin, key],
        )?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries WHERE origin = ?1 ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([self.origin.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn usage(&self) -> StoreResult<usize> {
        self.stored_usage()
    }
}
