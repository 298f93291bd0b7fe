//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize each configured subsystem in a fixed order
//! - Leave unconfigured subsystems absent
//! - Build the HTTP server with its cross-cutting middleware
//!
//! # Design Decisions
//! - Fail fast: the first subsystem error ends startup
//! - No rollback: handles acquired before the failing step are dropped with
//!   the unwound locals, never closed gracefully
//! - Subsystems initialize in order, not concurrently

use thiserror::Error;

use crate::auth::keys::{load_private_key, load_public_key, KeyError};
use crate::config::Settings;
use crate::database::{self, DatabaseError};
use crate::environment::Environment;
use crate::http::HttpServer;
use crate::storage::{ObjectStore, ObjectStoreError};

/// Startup error naming the subsystem that failed.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("object store error: {0}")]
    ObjectStore(#[source] ObjectStoreError),

    #[error("database error: {0}")]
    Database(#[source] DatabaseError),

    #[error("private key error: {0}")]
    PrivateKey(#[source] KeyError),

    #[error("public key error: {0}")]
    PublicKey(#[source] KeyError),
}

/// Build an [`Environment`] from settings.
///
/// Order: object store, database, private key, public key, HTTP server.
pub async fn initialize(settings: Settings) -> Result<Environment, InitError> {
    let object_store = if settings.object_store.enabled() {
        let store = ObjectStore::connect(&settings.object_store)
            .await
            .map_err(InitError::ObjectStore)?;
        Some(store)
    } else {
        None
    };

    let database = if settings.database.enabled() {
        let pool = database::connect(&settings.database)
            .await
            .map_err(InitError::Database)?;
        tracing::info!(host = %settings.database.host, database = %settings.database.name, "Connected to database");
        Some(pool)
    } else {
        None
    };

    let auth_private_key = if settings.auth.private_key.is_empty() {
        None
    } else {
        Some(load_private_key(&settings.auth.private_key).map_err(InitError::PrivateKey)?)
    };

    let auth_public_key = if settings.auth.public_key.is_empty() {
        None
    } else {
        Some(load_public_key(&settings.auth.public_key).map_err(InitError::PublicKey)?)
    };

    let server = if settings.http.listen_address.is_empty() {
        HttpServer::new()
    } else {
        HttpServer::configured()
    };

    let env = Environment {
        settings,
        auth_public_key,
        auth_private_key,
        database,
        object_store,
        server,
    };
    tracing::info!(environment = ?env, "Environment initialized");
    Ok(env)
}
