//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Orchestrate repository calls and view updates per user action.
//! - Keep page event handling decoupled from storage details.
//!
//! # Invariants
//! - Storage failures never abort a use-case; the in-memory state moves on
//!   and the caller is told the change was not persisted.

use crate::repo::RepoError;

pub mod capsule_service;
pub mod settings_service;

/// Whether a state change reached durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Persisted,
    /// Applied in memory only.
    Unpersisted(RepoError),
}

impl Persistence {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }

    fn from_result(result: Result<(), RepoError>) -> Self {
        match result {
            Ok(()) => Self::Persisted,
            Err(err) => Self::Unpersisted(err),
        }
    }
}
