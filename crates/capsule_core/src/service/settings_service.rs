//! Theme and visit-count use-cases.
//!
//! # Invariants
//! - The persisted theme decides what the page shows; the body class is
//!   only read to compute the toggle target.
//! - `record_visit` runs once per page load.

use crate::model::setting::Theme;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::Persistence;
use crate::view::node::{Element, Markup};
use log::{info, warn};

/// Body class present while the light theme is active.
pub const LIGHT_MODE_CLASS: &str = "light-mode";

/// Settings facade applying persisted values to the page.
pub struct SettingsService<R: SettingsRepository> {
    repo: R,
    toggle_id: String,
    counter_id: String,
    theme: Theme,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R, toggle_id: impl Into<String>, counter_id: impl Into<String>) -> Self {
        Self {
            repo,
            toggle_id: toggle_id.into(),
            counter_id: counter_id.into(),
            theme: Theme::default(),
        }
    }

    /// Theme currently shown.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Reads the persisted theme and applies it to the page.
    pub fn restore_theme(&mut self, body: &mut Element) -> Theme {
        self.theme = self.repo.theme();
        self.apply_theme(body);
        self.theme
    }

    /// Flips the shown theme and persists the result.
    ///
    /// Returns `None` when the page has no theme toggle.
    pub fn toggle_theme(&mut self, body: &mut Element) -> Option<(Theme, Persistence)> {
        body.find_by_id(&self.toggle_id)?;

        let target = if body.has_class(LIGHT_MODE_CLASS) {
            Theme::Dark
        } else {
            Theme::Light
        };

        let persistence = match self.repo.set_theme(target) {
            Ok(()) => {
                self.theme = self.repo.theme();
                Persistence::Persisted
            }
            Err(err) => {
                warn!(
                    "event=theme_toggle module=service status=unpersisted theme={} error={}",
                    target, err
                );
                self.theme = target;
                Persistence::Unpersisted(err)
            }
        };

        self.apply_theme(body);
        info!(
            "event=theme_toggle module=service status=ok theme={}",
            self.theme
        );
        Some((self.theme, persistence))
    }

    /// Counts this page load and shows the total.
    pub fn record_visit(&mut self, body: &mut Element) -> (u64, Persistence) {
        let (count, persistence) = match self.repo.increment_visit_count() {
            Ok(count) => (count, Persistence::Persisted),
            Err(err) => {
                warn!(
                    "event=visit_record module=service status=unpersisted error={}",
                    err
                );
                (
                    self.repo.visit_count().saturating_add(1),
                    Persistence::Unpersisted(err),
                )
            }
        };

        if let Some(counter) = body.find_by_id_mut(&self.counter_id) {
            counter.set_text(Markup::from_escaped(count.to_string()));
        }
        info!("event=visit_record module=service status=ok count={count}");
        (count, persistence)
    }

    fn apply_theme(&self, body: &mut Element) {
        body.set_class(LIGHT_MODE_CLASS, self.theme == Theme::Light);
        if let Some(toggle) = body.find_by_id_mut(&self.toggle_id) {
            let label = match self.theme {
                Theme::Light => "Dark mode",
                Theme::Dark => "Light mode",
            };
            toggle.set_text(Markup::trusted(label));
        }
    }
}
