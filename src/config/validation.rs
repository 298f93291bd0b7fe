//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap and serde handle syntax)
//! - Check that enabled subsystems carry the fields they need
//!
//! # Design Decisions
//! - `validate_settings` returns all validation errors, not just the first
//! - Per-subsystem checks return the first error so startup can fail fast

use thiserror::Error;
use url::Url;

use crate::config::schema::{DatabaseSettings, ObjectStoreSettings, Settings};

/// A required field is missing or a value is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("must specify {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl DatabaseSettings {
    /// Name, user and password are required once the database is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Missing("database name"));
        }
        if self.user.is_empty() {
            return Err(ConfigError::Missing("database user"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Missing("database password"));
        }
        Ok(())
    }
}

impl ObjectStoreSettings {
    /// Endpoint URL derived from the configured host and TLS flag.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Missing("storage url"));
        }
        if self.url.contains("://") {
            return Err(ConfigError::Invalid {
                field: "storage url",
                reason: "expected host[:port] without a scheme".to_string(),
            });
        }
        let scheme = if self.disable_ssl { "http" } else { "https" };
        Url::parse(&format!("{}://{}", scheme, self.url)).map_err(|e| ConfigError::Invalid {
            field: "storage url",
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::Missing("storage region"));
        }
        self.endpoint().map(|_| ())
    }
}

/// Validate every enabled subsystem, collecting all errors.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if settings.database.enabled() {
        if let Err(e) = settings.database.validate() {
            errors.push(e);
        }
    }

    if settings.object_store.enabled() {
        if let Err(e) = settings.object_store.validate() {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
