//! Runtime bootstrap for backend services.
//!
//! Resolves [`Settings`], acquires the configured resources into an
//! [`Environment`] and offers RS512 JWT authentication for its routes.

pub mod auth;
pub mod config;
pub mod database;
pub mod environment;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod storage;

pub use auth::{JwtClaims, JwtLayer};
pub use config::Settings;
pub use environment::Environment;
pub use http::HttpServer;
pub use lifecycle::{initialize, InitError, Shutdown};
