//! Dialog configuration
//!
//! Hosts either build a [`DialogConfig`] in code or load the `[dialog]`
//! table of a TOML file:
//!
//! ```toml
//! [dialog]
//! debounce_ms = 500
//! allow_cancel_while_committing = false
//! entry_update_mode = "live"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default quiescence window before the validator is called
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// When the entry path editor hands a new path to its committer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryUpdateMode {
    /// On every keystroke; confirm only rebases the session
    #[default]
    Live,
    /// Once, on confirm
    Deferred,
}

/// Dialog configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialogConfig {
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Whether cancel stays available while a commit is in flight
    pub allow_cancel_while_committing: bool,
    /// Entry path update mode
    pub entry_update_mode: EntryUpdateMode,
}

impl DialogConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Debounce window
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// With debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With cancel-during-commit policy
    #[inline]
    #[must_use]
    pub fn with_cancel_while_committing(mut self, allow: bool) -> Self {
        self.allow_cancel_while_committing = allow;
        self
    }

    /// With entry update mode
    #[inline]
    #[must_use]
    pub fn with_entry_update_mode(mut self, mode: EntryUpdateMode) -> Self {
        self.entry_update_mode = mode;
        self
    }

    /// Load the `[dialog]` table from TOML; a missing table yields defaults
    ///
    /// # Errors
    /// Returns error on malformed TOML or unknown keys
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        Ok(file.dialog)
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            allow_cancel_while_committing: false,
            entry_update_mode: EntryUpdateMode::Live,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    dialog: DialogConfig,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("invalid dialog configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
