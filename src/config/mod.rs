//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! flags / environment variables        TOML file (--config)
//!     → loader.rs (clap parse)         → loader.rs (serde deserialize)
//!                 ↘                   ↙
//!                  validation.rs (semantic checks)
//!                  → Settings (validated, immutable)
//!                  → passed by value into lifecycle::startup
//! ```
//!
//! # Design Decisions
//! - Settings are an explicit value, never looked up globally by core code
//! - All fields have defaults to allow minimal configs
//! - An empty field disables the subsystem it configures

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, resolve_settings, Cli, LoadError};
pub use schema::{AuthSettings, DatabaseSettings, HttpSettings, ObjectStoreSettings, Settings};
pub use validation::{validate_settings, ConfigError};
