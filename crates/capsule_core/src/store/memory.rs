//! In-process key-value store.
//!
//! Used for ephemeral pages and tests. Contents live as long as the value.

use super::{check_quota, entry_units, KeyValueStore, StoreResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Map-backed store with optional quota.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_units: Option<usize>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses writes beyond `quota_units`.
    pub fn with_quota(quota_units: usize) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota_units: Some(quota_units),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.borrow_mut();
        let usage = entries
            .iter()
            .map(|(stored_key, stored_value)| entry_units(stored_key, stored_value))
            .sum();
        check_quota(
            self.quota_units,
            usage,
            key,
            entries.get(key).map(String::as_str),
            value,
        )?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }

    fn usage(&self) -> StoreResult<usize> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .map(|(key, value)| entry_units(key, value))
            .sum())
    }
}
