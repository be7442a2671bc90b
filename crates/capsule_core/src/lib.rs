//! Page core for the film capsule feature.
//! Owns the persisted capsule log, page settings and the grid view.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod page;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use config::{PageBindings, StorageKeys, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{Record, RecordField, RecordValidationError};
pub use model::setting::Theme;
pub use page::{CapsulePage, EventOutcome, EventStatus, PageEvent, StatusKind, StatusToken};
pub use repo::record_repo::{KvRecordLogRepository, LogState, RecordLogRepository};
pub use repo::settings_repo::{KvSettingsRepository, SettingsRepository};
pub use repo::{RepoError, RepoResult};
pub use service::capsule_service::CapsuleService;
pub use service::settings_service::SettingsService;
pub use service::Persistence;
pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult};
pub use view::node::{Document, Element, Markup, Node};
pub use view::reconciler::{dynamic_cards, static_cards, RenderReport, ViewReconciler};
pub use view::sanitize::{escape_html, HtmlSanitizer, Sanitizer};
pub use view::template::default_document;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
