//! The resource bundle a service runs on.
//!
//! Services compose an [`Environment`] rather than extend it: they keep it in
//! their own state, register routes on `server`, and read the optional
//! handles they were configured with.

use std::fmt;
use std::io;

use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::auth::{AuthPrivateKey, AuthPublicKey, JwtLayer};
use crate::config::Settings;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{self, Shutdown};
use crate::lifecycle::signals;
use crate::lifecycle::startup::{initialize, InitError};
use crate::storage::ObjectStore;

/// Resource handles needed by a web service.
///
/// Presence of each optional handle follows its settings:
/// - `auth_public_key` / `auth_private_key`: key path non-empty and parsed
/// - `database`: host and port set, with name, user and password non-empty
/// - `object_store`: bucket non-empty and created
pub struct Environment {
    pub settings: Settings,
    pub auth_public_key: Option<AuthPublicKey>,
    pub auth_private_key: Option<AuthPrivateKey>,
    pub database: Option<PgPool>,
    pub object_store: Option<ObjectStore>,
    pub server: HttpServer,
}

impl Environment {
    /// Initialize every configured subsystem. See [`initialize`].
    pub async fn new(settings: Settings) -> Result<Self, InitError> {
        initialize(settings).await
    }

    /// Like [`Environment::new`], but exits the process on failure.
    pub async fn must(settings: Settings) -> Self {
        match initialize(settings).await {
            Ok(env) => env,
            Err(e) => {
                tracing::error!(error = %e, "Startup failed");
                std::process::exit(1);
            }
        }
    }

    /// Serve on the configured listen address until Ctrl+C.
    pub async fn run(&self) -> io::Result<()> {
        let listener = self.bind().await?;
        self.server.run(listener, signals::ctrl_c()).await
    }

    /// Serve on the configured listen address until `shutdown` fires.
    pub async fn run_until(&self, shutdown: &Shutdown) -> io::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` fires.
    pub async fn serve(&self, listener: TcpListener, shutdown: &Shutdown) -> io::Result<()> {
        self.server
            .run(listener, shutdown::wait(shutdown.subscribe()))
            .await
    }

    async fn bind(&self) -> io::Result<TcpListener> {
        let address = &self.settings.http.listen_address;
        tracing::info!(address = %address, "Listening");
        TcpListener::bind(address)
            .await
            .map_err(|e| io::Error::new(e.kind(), format!("failed to bind {}: {}", address, e)))
    }

    /// Release resource handles. Safe to call more than once.
    pub async fn destroy(&mut self) {
        if let Some(db) = self.database.take() {
            db.close().await;
            tracing::debug!("Database pool closed");
        }
        // Nothing else needs cleanup
    }

    /// JWT authentication middleware verifying tokens with the public key.
    ///
    /// # Panics
    ///
    /// Panics when no public key is configured. Serving authenticated routes
    /// without a verification key is a deployment defect, not a runtime error.
    pub fn jwt_layer(&self) -> JwtLayer {
        match &self.auth_public_key {
            Some(key) => JwtLayer::new(key.clone()),
            None => panic!("JWT middleware unavailable: no public key set"),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("listen_address", &self.settings.http.listen_address)
            .field("auth_public_key", &self.auth_public_key.is_some())
            .field("auth_private_key", &self.auth_private_key.is_some())
            .field("database", &self.database.is_some())
            .field("object_store", &self.object_store.is_some())
            .field("server_configured", &self.server.is_configured())
            .finish()
    }
}
