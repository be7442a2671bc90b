//! Capsule use-case service.
//!
//! # Responsibility
//! - Own the in-memory record log for one page.
//! - Re-render the grid after every log change.
//!
//! # Invariants
//! - After a persisted change, `records()` equals the persisted log.
//! - Rejected submissions change neither memory, storage nor the view.

use crate::model::record::{Record, RecordValidationError};
use crate::repo::record_repo::{LogState, RecordLogRepository};
use crate::repo::RepoError;
use crate::service::Persistence;
use crate::view::node::Element;
use crate::view::reconciler::{RenderReport, ViewReconciler};
use crate::view::sanitize::{HtmlSanitizer, Sanitizer};
use log::{info, warn};

/// Capsule log facade coupling a repository with the grid renderer.
pub struct CapsuleService<R: RecordLogRepository, Z: Sanitizer = HtmlSanitizer> {
    repo: R,
    reconciler: ViewReconciler<Z>,
    records: Vec<Record>,
}

impl<R: RecordLogRepository, Z: Sanitizer> CapsuleService<R, Z> {
    /// Creates a service with an empty in-memory log; call `restore` next.
    pub fn new(repo: R, reconciler: ViewReconciler<Z>) -> Self {
        Self {
            repo,
            reconciler,
            records: Vec::new(),
        }
    }

    /// In-memory log, oldest first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Persisted log diagnostics.
    pub fn log_state(&self) -> LogState {
        self.repo.inspect()
    }

    /// Reloads the log from storage and renders it.
    pub fn restore(&mut self, body: &mut Element) -> Option<RenderReport> {
        self.records = self.repo.load();
        info!(
            "event=capsule_restore module=service status=ok count={}",
            self.records.len()
        );
        self.render(body)
    }

    /// Validates and appends one capsule, then re-renders.
    ///
    /// # Errors
    /// - Returns the validation error when any field is blank; nothing changes.
    pub fn submit(
        &mut self,
        body: &mut Element,
        title: &str,
        year: &str,
        memory: &str,
    ) -> Result<Persistence, RecordValidationError> {
        let record = Record::new(title, year, memory)?;

        let persistence = match self.repo.append(record.clone()) {
            Ok(records) => {
                self.records = records;
                Persistence::Persisted
            }
            Err(RepoError::Validation(err)) => return Err(err),
            Err(err) => {
                warn!(
                    "event=capsule_submit module=service status=unpersisted error={}",
                    err
                );
                self.records.push(record);
                Persistence::Unpersisted(err)
            }
        };

        self.render(body);
        Ok(persistence)
    }

    /// Empties the log in memory and storage, then re-renders.
    pub fn clear(&mut self, body: &mut Element) -> Persistence {
        let persistence = Persistence::from_result(self.repo.clear());
        if let Persistence::Unpersisted(err) = &persistence {
            warn!(
                "event=capsule_clear module=service status=unpersisted error={}",
                err
            );
        }

        self.records.clear();
        self.render(body);
        persistence
    }

    fn render(&self, body: &mut Element) -> Option<RenderReport> {
        self.reconciler.render(body, &self.records)
    }
}
