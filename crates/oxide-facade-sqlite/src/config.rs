//! Connection settings.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable read by [`SqliteConfig::from_env`].
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Errors raised while loading a [`SqliteConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document is malformed or has unexpected fields.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The database URL is blank.
    #[error("database url is empty")]
    EmptyUrl,
}

/// How to open a SQLite database.
///
/// Every field has a default, so a partial JSON document such as
/// `{"url": "sqlite:app.db"}` is enough.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SqliteConfig {
    /// Database URL, e.g. `sqlite::memory:` or `sqlite:data/app.db`.
    pub url: String,
    /// Create the database file if it does not exist.
    pub create_if_missing: bool,
    /// Enforce foreign key constraints.
    pub foreign_keys: bool,
    /// How long a statement waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            create_if_missing: true,
            foreign_keys: true,
            busy_timeout_ms: 5_000,
        }
    }
}

impl SqliteConfig {
    /// Creates a configuration for the given URL with default settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Configuration for a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Reads the URL from `DATABASE_URL`, falling back to the default
    /// in-memory database when it is unset.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(DATABASE_URL_VAR).map_or_else(|_| Self::default(), Self::new)
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown fields or a blank URL.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUrl`] for a blank URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        Ok(())
    }

    /// Sets whether a missing database file is created.
    #[must_use]
    pub const fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets whether foreign keys are enforced.
    #[must_use]
    pub const fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout_ms = millis;
        self
    }

    /// Returns the busy timeout as a duration.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
