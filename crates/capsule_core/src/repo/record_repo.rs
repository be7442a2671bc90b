//! Record log repository contract and key-value implementation.
//!
//! # Responsibility
//! - Persist the whole capsule log as one JSON array under one key.
//! - Self-heal a stored value that is not a JSON array to an empty log.
//!
//! # Invariants
//! - `append` persists the full sequence before returning it.
//! - `append` never writes when the current log could not be read.
//! - Array elements that do not decode as records are skipped on read but
//!   kept verbatim on write; only a non-array value is replaced.
//! - A rejected `append` leaves storage untouched.
//! - `clear` removes the key rather than writing `[]`.

use crate::config::StorageKeys;
use crate::model::record::Record;
use crate::repo::{RepoError, RepoResult};
use crate::store::KeyValueStore;
use log::{info, warn};
use serde_json::Value;

/// Diagnostic view of the persisted log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogState {
    /// Key never written, or removed by `clear`.
    Absent,
    /// Key holds an array whose elements are all records (zero included).
    Populated(usize),
    /// Key holds an array where some elements are not records.
    Partial { records: usize, skipped: usize },
    /// Key holds something that is not a JSON array.
    Malformed,
    /// The store refused the read.
    Unavailable,
}

/// Repository interface for the append-only capsule log.
pub trait RecordLogRepository {
    /// Reads the persisted log; absent, non-array or unreadable state loads
    /// as empty.
    fn load(&self) -> Vec<Record>;
    /// Validates, appends and persists one record; returns the new log.
    fn append(&self, record: Record) -> RepoResult<Vec<Record>>;
    /// Removes the persisted log entirely.
    fn clear(&self) -> RepoResult<()>;
    /// Reports the persisted state without healing it.
    fn inspect(&self) -> LogState;
}

/// Record log stored as a JSON array in a key-value store.
pub struct KvRecordLogRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

enum Decoded {
    Absent,
    Entries(Vec<Value>),
    Malformed(String),
}

impl<S: KeyValueStore> KvRecordLogRepository<S> {
    pub fn new(store: S, keys: &StorageKeys) -> Self {
        Self {
            store,
            key: keys.record_log.clone(),
        }
    }

    /// Storage key holding the log.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads and parses the stored value; store failures are returned.
    fn read(&self) -> RepoResult<Decoded> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Decoded::Absent);
        };

        Ok(match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => Decoded::Entries(entries),
            Ok(other) => {
                Decoded::Malformed(format!("expected array, found {}", json_kind(&other)))
            }
            Err(err) => Decoded::Malformed(err.to_string()),
        })
    }

    /// Records among `entries`, oldest first; undecodable elements are skipped.
    fn records_from(&self, entries: &[Value]) -> Vec<Record> {
        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                match serde_json::from_value::<Record>(entry.clone()) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!(
                            "event=record_log_load module=repo status=skipped key={} index={} error={}",
                            self.key, index, err
                        );
                        None
                    }
                }
            })
            .collect()
    }

    fn persist(&self, entries: &[Value]) -> RepoResult<()> {
        let encoded =
            serde_json::to_string(entries).map_err(|err| RepoError::Encode(err.to_string()))?;
        self.store.set(&self.key, &encoded)?;
        Ok(())
    }
}

impl<S: KeyValueStore> RecordLogRepository for KvRecordLogRepository<S> {
    fn load(&self) -> Vec<Record> {
        match self.read() {
            Ok(Decoded::Absent) => Vec::new(),
            Ok(Decoded::Entries(entries)) => self.records_from(&entries),
            Ok(Decoded::Malformed(reason)) => {
                warn!(
                    "event=record_log_load module=repo status=malformed key={} error={}",
                    self.key, reason
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=record_log_load module=repo status=degraded key={} error={}",
                    self.key, err
                );
                Vec::new()
            }
        }
    }

    fn append(&self, record: Record) -> RepoResult<Vec<Record>> {
        let record = Record::new(record.title, record.year, record.memory)?;
        let encoded =
            serde_json::to_value(&record).map_err(|err| RepoError::Encode(err.to_string()))?;

        let mut entries = match self.read() {
            Ok(Decoded::Entries(entries)) => entries,
            Ok(Decoded::Absent | Decoded::Malformed(_)) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=record_log_append module=repo status=error stage=read key={} error={}",
                    self.key, err
                );
                return Err(err);
            }
        };
        entries.push(encoded);

        if let Err(err) = self.persist(&entries) {
            warn!(
                "event=record_log_append module=repo status=error stage=write key={} count={} error={}",
                self.key,
                entries.len(),
                err
            );
            return Err(err);
        }

        info!(
            "event=record_log_append module=repo status=ok key={} count={}",
            self.key,
            entries.len()
        );
        Ok(self.records_from(&entries))
    }

    fn clear(&self) -> RepoResult<()> {
        self.store.remove(&self.key)?;
        info!(
            "event=record_log_clear module=repo status=ok key={}",
            self.key
        );
        Ok(())
    }

    fn inspect(&self) -> LogState {
        match self.read() {
            Ok(Decoded::Absent) => LogState::Absent,
            Ok(Decoded::Entries(entries)) => {
                let records = entries
                    .iter()
                    .filter(|entry| serde_json::from_value::<Record>((*entry).clone()).is_ok())
                    .count();
                let skipped = entries.len() - records;
                if skipped == 0 {
                    LogState::Populated(records)
                } else {
                    LogState::Partial { records, skipped }
                }
            }
            Ok(Decoded::Malformed(_)) => LogState::Malformed,
            Err(_) => LogState::Unavailable,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Object(_) => "object",
        Value::Array(_) => "array",
    }
}
