//! Settings repository contract and key-value implementation.
//!
//! # Invariants
//! - Each setting lives under its own key and is read/written alone.
//! - The persisted theme is the source of truth for the current theme.
//! - Visit count only ever moves up by one per increment.

use crate::config::StorageKeys;
use crate::model::setting::Theme;
use crate::repo::RepoResult;
use crate::store::KeyValueStore;
use log::warn;

/// Repository interface for single-value page settings.
pub trait SettingsRepository {
    /// Current theme; absent or unrecognized values yield `Theme::Dark`.
    fn theme(&self) -> Theme;
    fn set_theme(&self, theme: Theme) -> RepoResult<()>;
    /// Current visit count; absent or non-decimal values yield 0.
    fn visit_count(&self) -> u64;
    /// Adds one visit, persists it and returns the new count.
    fn increment_visit_count(&self) -> RepoResult<u64>;
}

/// Settings stored as plain strings in a key-value store.
pub struct KvSettingsRepository<S: KeyValueStore> {
    store: S,
    theme_key: String,
    visit_key: String,
}

impl<S: KeyValueStore> KvSettingsRepository<S> {
    pub fn new(store: S, keys: &StorageKeys) -> Self {
        Self {
            store,
            theme_key: keys.theme.clone(),
            visit_key: keys.visit_count.clone(),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=setting_read module=repo status=degraded key={key} error={err}");
                None
            }
        }
    }
}

impl<S: KeyValueStore> SettingsRepository for KvSettingsRepository<S> {
    fn theme(&self) -> Theme {
        let Some(raw) = self.read(&self.theme_key) else {
            return Theme::default();
        };
        Theme::parse(&raw).unwrap_or_else(|| {
            warn!(
                "event=setting_read module=repo status=malformed key={}",
                self.theme_key
            );
            Theme::default()
        })
    }

    fn set_theme(&self, theme: Theme) -> RepoResult<()> {
        self.store.set(&self.theme_key, theme.as_str())?;
        Ok(())
    }

    fn visit_count(&self) -> u64 {
        let Some(raw) = self.read(&self.visit_key) else {
            return 0;
        };
        let parsed = if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) {
            raw.parse::<u64>().ok()
        } else {
            None
        };
        parsed.unwrap_or_else(|| {
            warn!(
                "event=setting_read module=repo status=malformed key={}",
                self.visit_key
            );
            0
        })
    }

    fn increment_visit_count(&self) -> RepoResult<u64> {
        let next = self.visit_count().saturating_add(1);
        self.store.set(&self.visit_key, &next.to_string())?;
        Ok(next)
    }
}
