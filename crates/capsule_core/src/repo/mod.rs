//! Typed repositories over the key-value store.
//!
//! # Responsibility
//! - Isolate serialization of records and settings from page handling.
//! - Translate storage failures into semantic repository errors.
//!
//! # Invariants
//! - Write paths validate before touching storage.
//! - Read paths never fail on malformed persisted state; they degrade to
//!   the empty/default value and log a warning.

use crate::model::record::RecordValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod record_repo;
pub mod settings_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record log and settings writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(RecordValidationError),
    Store(StoreError),
    Encode(String),
}

impl RepoError {
    /// Whether the failure came from the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Encode(message) => write!(f, "failed to encode persisted value: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Encode(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
