//! Settings resolution from the command line, the environment, or disk.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::config::schema::Settings;
use crate::config::validation::{validate_settings, ConfigError};

/// Error type for settings resolution.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Invalid(Vec<ConfigError>),
}

fn join(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command line surface. Every flag falls back to an environment variable.
#[derive(Debug, Parser)]
#[command(name = "service-base")]
#[command(about = "Backend service bootstrap", long_about = None)]
pub struct Cli {
    /// TOML settings file; replaces the individual flags when given
    #[arg(long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub settings: Settings,
}

impl Cli {
    /// Settings from the file named by `--config`, else from the flags.
    pub fn into_settings(self) -> Result<Settings, LoadError> {
        if let Some(path) = self.config {
            return load_settings(&path);
        }
        validate_settings(&self.settings).map_err(LoadError::Invalid)?;
        Ok(self.settings)
    }
}

/// Parse the process arguments and environment into validated settings.
pub fn resolve_settings() -> Result<Settings, LoadError> {
    Cli::parse().into_settings()
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, LoadError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;

    validate_settings(&settings).map_err(LoadError::Invalid)?;

    Ok(settings)
}
