//! Durable key-value storage contract and implementations.
//!
//! # Responsibility
//! - Model origin-scoped, synchronous string storage behind one trait.
//! - Enforce per-origin quota on writes.
//!
//! # Invariants
//! - An absent key is `Ok(None)`, never an error, and differs from a stored
//!   empty string.
//! - A write refused for quota leaves the previously stored value intact.
//! - All operations complete before returning; nothing is deferred.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The write would push the origin past its quota.
    QuotaExceeded { requested: usize, quota: usize },
    /// The backing storage could not be reached or refused the operation.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded { requested, quota } => write!(
                f,
                "storage quota exceeded: {requested} units requested, quota is {quota}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<crate::db::DbError> for StoreError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

/// Synchronous string storage scoped to one origin.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
    /// Returns every stored key, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
    /// Returns current stored size in UTF-16 code units.
    fn usage(&self) -> StoreResult<usize>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn usage(&self) -> StoreResult<usize> {
        (**self).usage()
    }
}

/// Size of one entry as browsers count it against quota.
pub(crate) fn entry_units(key: &str, value: &str) -> usize {
    key.encode_utf16().count() + value.encode_utf16().count()
}

/// Checks whether replacing `previous` by `value` under `key` fits in `quota`.
///
/// `usage` is the current total including `previous`.
pub(crate) fn check_quota(
    quota: Option<usize>,
    usage: usize,
    key: &str,
    previous: Option<&str>,
    value: &str,
) -> StoreResult<()> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let released = previous.map_or(0, |old| entry_units(key, old));
    let requested = usage.saturating_sub(released) + entry_units(key, value);
    if requested > quota {
        return Err(StoreError::QuotaExceeded { requested, quota });
    }

    Ok(())
}
