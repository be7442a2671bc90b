//! Static configuration for storage keys, page bindings and store limits.
//!
//! # Responsibility
//! - Name every persisted key and every DOM binding in one place.
//! - Provide defaults that match the page markup and existing stored data.
//!
//! # Invariants
//! - Default keys must stay stable; renaming them orphans data stored by
//!   earlier page loads.

/// Origin used when the caller does not provide one.
pub const DEFAULT_ORIGIN: &str = "local";

/// Per-origin storage quota in UTF-16 code units (browser-equivalent 5 MB).
pub const DEFAULT_QUOTA_UNITS: usize = 5_000_000;

/// Persisted key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// JSON array of capsule records.
    pub record_log: String,
    /// `"light"` or `"dark"`.
    pub theme: String,
    /// Decimal visit counter.
    pub visit_count: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            record_log: "filmCapsules".to_string(),
            theme: "netflixTheme".to_string(),
            visit_count: "visitCount".to_string(),
        }
    }
}

/// Element ids the page core reads from and renders into.
///
/// Every binding is optional at runtime; a missing element disables the
/// feature that depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBindings {
    pub title_input: String,
    pub year_input: String,
    pub memory_input: String,
    pub grid: String,
    pub message: String,
    pub clear_button: String,
    pub theme_toggle: String,
    pub visit_counter: String,
}

impl Default for PageBindings {
    fn default() -> Self {
        Self {
            title_input: "capsuleTitle".to_string(),
            year_input: "capsuleYear".to_string(),
            memory_input: "capsuleMemory".to_string(),
            grid: "capsuleGrid".to_string(),
            message: "capsuleMessage".to_string(),
            clear_button: "clearCapsules".to_string(),
            theme_toggle: "themeToggle".to_string(),
            visit_counter: "visitCounter".to_string(),
        }
    }
}

/// Durable store scoping and limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Scope shared by every key written through one store.
    pub origin: String,
    /// Maximum stored size per origin, `None` for unlimited.
    pub quota_units: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            quota_units: Some(DEFAULT_QUOTA_UNITS),
        }
    }
}
