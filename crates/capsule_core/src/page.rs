//! Page application state and event dispatch.
//!
//! # Responsibility
//! - Own the document, services and status line for one page load.
//! - Translate UI events into service calls and visible feedback.
//!
//! # Invariants
//! - Constructing a page counts exactly one visit, before anything else
//!   reads the count.
//! - No event handler fails the page; errors become status messages.
//! - A missing bound element disables its feature and the event is ignored.
//!
//! Pages do not observe writes made by other pages sharing the same store;
//! the last writer wins.

use crate::config::{PageBindings, StorageKeys};
use crate::model::record::{Record, RecordValidationError};
use crate::model::setting::Theme;
use crate::repo::record_repo::{KvRecordLogRepository, LogState, RecordLogRepository};
use crate::repo::settings_repo::{KvSettingsRepository, SettingsRepository};
use crate::repo::RepoError;
use crate::service::capsule_service::CapsuleService;
use crate::service::settings_service::SettingsService;
use crate::service::Persistence;
use crate::store::KeyValueStore;
use crate::view::node::{Document, Element, Markup};
use crate::view::reconciler::ViewReconciler;
use crate::view::sanitize::{HtmlSanitizer, Sanitizer};
use log::{debug, info};
use std::time::Duration;

/// Delay before a success message is cleared.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(3);

const MSG_SAVED: &str = "Capsule sealed. It will be here next time you visit.";
const MSG_INVALID: &str = "Please fill in the title, year and memory.";
const MSG_UNPERSISTED: &str =
    "Saved for this visit only: this browser refused to store it (storage full or unavailable).";
const MSG_CLEAR_UNPERSISTED: &str =
    "Cleared for this visit only: this browser refused to update storage.";
const MSG_SETTING_UNPERSISTED: &str =
    "Your preference could not be saved in this browser; it applies to this visit only.";

/// UI events handled by the page core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    SubmitCapsule,
    ClearCapsules,
    ToggleTheme,
    /// Delayed clear of the status message shown under `token`.
    DismissStatus(StatusToken),
}

/// Identifies one shown status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusToken(u64);

/// Severity of the status line under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Invalid,
    StorageWarning,
}

impl StatusKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "is-success",
            Self::Invalid => "is-error",
            Self::StorageWarning => "is-warning",
        }
    }
}

/// Status line currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: &'static str,
    pub token: StatusToken,
}

/// What an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStatus {
    Applied,
    Rejected(RecordValidationError),
    /// Applied in memory; persistence failed.
    Degraded(RepoError),
    /// Required element missing or nothing to do.
    Ignored,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome {
    pub status: EventStatus,
    /// When set, the host dispatches `DismissStatus(token)` after the delay.
    pub dismiss_after: Option<(Duration, StatusToken)>,
}

impl EventOutcome {
    fn new(status: EventStatus) -> Self {
        Self {
            status,
            dismiss_after: None,
        }
    }

    fn ignored() -> Self {
        Self::new(EventStatus::Ignored)
    }
}

/// Page state for one load, threaded through every event.
pub struct CapsulePage<R, S, Z = HtmlSanitizer>
where
    R: RecordLogRepository,
    S: SettingsRepository,
    Z: Sanitizer,
{
    document: Document,
    bindings: PageBindings,
    capsules: CapsuleService<R, Z>,
    settings: SettingsService<S>,
    visit_count: u64,
    status: Option<StatusMessage>,
    next_token: u64,
}

impl<'s, K: KeyValueStore> CapsulePage<KvRecordLogRepository<&'s K>, KvSettingsRepository<&'s K>> {
    /// Loads a page over `store` with default keys and bindings.
    pub fn open(store: &'s K, document: Document) -> Self {
        let keys = StorageKeys::default();
        Self::load(
            KvRecordLogRepository::new(store, &keys),
            KvSettingsRepository::new(store, &keys),
            HtmlSanitizer,
            PageBindings::default(),
            document,
        )
    }
}

impl<R, S, Z> CapsulePage<R, S, Z>
where
    R: RecordLogRepository,
    S: SettingsRepository,
    Z: Sanitizer,
{
    /// Runs page-load initialization.
    ///
    /// Order: count the visit, apply the persisted theme, render the log.
    pub fn load(
        capsule_repo: R,
        settings_repo: S,
        sanitizer: Z,
        bindings: PageBindings,
        document: Document,
    ) -> Self {
        let reconciler = ViewReconciler::with_sanitizer(bindings.grid.as_str(), sanitizer);
        let mut page = Self {
            document,
            capsules: CapsuleService::new(capsule_repo, reconciler),
            settings: SettingsService::new(
                settings_repo,
                bindings.theme_toggle.as_str(),
                bindings.visit_counter.as_str(),
            ),
            bindings,
            visit_count: 0,
            status: None,
            next_token: 0,
        };

        let (visit_count, persistence) = page.settings.record_visit(page.document.body_mut());
        page.visit_count = visit_count;
        if !persistence.is_persisted() {
            page.show_status(StatusKind::StorageWarning, MSG_SETTING_UNPERSISTED);
        }

        let theme = page.settings.restore_theme(page.document.body_mut());
        let report = page.capsules.restore(page.document.body_mut());

        info!(
            "event=page_load module=page status=ok visits={} theme={} records={} grid={}",
            page.visit_count,
            theme,
            page.capsules.records().len(),
            if report.is_some() { "present" } else { "missing" }
        );
        page
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for the host, e.g. to type into inputs.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn records(&self) -> &[Record] {
        self.capsules.records()
    }

    pub fn log_state(&self) -> LogState {
        self.capsules.log_state()
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme()
    }

    /// Visit count recorded by this page load.
    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Writes raw values into the form inputs that exist.
    pub fn fill_form(&mut self, title: &str, year: &str, memory: &str) {
        for (id, value) in [
            (self.bindings.title_input.as_str(), title),
            (self.bindings.year_input.as_str(), year),
            (self.bindings.memory_input.as_str(), memory),
        ] {
            if let Some(input) = self.document.body_mut().find_by_id_mut(id) {
                input.set_attr("value", value);
            }
        }
    }

    /// Handles one UI event to completion.
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        debug!("event=page_dispatch module=page status=start kind={event:?}");
        match event {
            PageEvent::SubmitCapsule => self.on_submit(),
            PageEvent::ClearCapsules => self.on_clear(),
            PageEvent::ToggleTheme => self.on_toggle_theme(),
            PageEvent::DismissStatus(token) => self.on_dismiss(token),
        }
    }

    fn on_submit(&mut self) -> EventOutcome {
        let Some((title, year, memory)) = self.read_form() else {
            return EventOutcome::ignored();
        };

        match self
            .capsules
            .submit(self.document.body_mut(), &title, &year, &memory)
        {
            Ok(Persistence::Persisted) => {
                self.reset_form();
                let token = self.show_status(StatusKind::Success, MSG_SAVED);
                EventOutcome {
                    status: EventStatus::Applied,
                    dismiss_after: Some((SUCCESS_DISMISS_AFTER, token)),
                }
            }
            Ok(Persistence::Unpersisted(err)) => {
                self.reset_form();
                self.show_status(StatusKind::StorageWarning, MSG_UNPERSISTED);
                EventOutcome::new(EventStatus::Degraded(err))
            }
            Err(err) => {
                self.show_status(StatusKind::Invalid, MSG_INVALID);
                EventOutcome::new(EventStatus::Rejected(err))
            }
        }
    }

    fn on_clear(&mut self) -> EventOutcome {
        if self.element(&self.bindings.clear_button).is_none() {
            return EventOutcome::ignored();
        }

        match self.capsules.clear(self.document.body_mut()) {
            Persistence::Persisted => {
                self.clear_status();
                EventOutcome::new(EventStatus::Applied)
            }
            Persistence::Unpersisted(err) => {
                self.show_status(StatusKind::StorageWarning, MSG_CLEAR_UNPERSISTED);
                EventOutcome::new(EventStatus::Degraded(err))
            }
        }
    }

    fn on_toggle_theme(&mut self) -> EventOutcome {
        match self.settings.toggle_theme(self.document.body_mut()) {
            None => EventOutcome::ignored(),
            Some((_, Persistence::Persisted)) => EventOutcome::new(EventStatus::Applied),
            Some((_, Persistence::Unpersisted(err))) => {
                self.show_status(StatusKind::StorageWarning, MSG_SETTING_UNPERSISTED);
                EventOutcome::new(EventStatus::Degraded(err))
            }
        }
    }

    fn on_dismiss(&mut self, token: StatusToken) -> EventOutcome {
        let current = self
            .status
            .as_ref()
            .is_some_and(|status| status.token == token);
        if !current {
            return EventOutcome::ignored();
        }

        self.clear_status();
        EventOutcome::new(EventStatus::Applied)
    }

    fn element(&self, id: &str) -> Option<&Element> {
        self.document.element_by_id(id)
    }

    fn read_form(&self) -> Option<(String, String, String)> {
        let value = |id: &str| {
            self.element(id)
                .map(|input| input.attr("value").unwrap_or_default().to_string())
        };
        Some((
            value(&self.bindings.title_input)?,
            value(&self.bindings.year_input)?,
            value(&self.bindings.memory_input)?,
        ))
    }

    fn reset_form(&mut self) {
        self.fill_form("", "", "");
    }

    fn show_status(&mut self, kind: StatusKind, text: &'static str) -> StatusToken {
        self.next_token += 1;
        let token = StatusToken(self.next_token);

        if let Some(message) = self.document.element_by_id_mut(&self.bindings.message) {
            for other in [StatusKind::Success, StatusKind::Invalid, StatusKind::StorageWarning] {
                message.remove_class(other.class());
            }
            message.add_class(kind.class());
            message.set_text(Markup::trusted(text));
        }

        self.status = Some(StatusMessage { kind, text, token });
        token
    }

    fn clear_status(&mut self) {
        if let Some(message) = self.document.element_by_id_mut(&self.bindings.message) {
            for kind in [StatusKind::Success, StatusKind::Invalid, StatusKind::StorageWarning] {
                message.remove_class(kind.class());
            }
            message.set_text(Markup::trusted(""));
        }
        self.status = None;
    }
}
