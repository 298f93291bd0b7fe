//! PostgreSQL connection pool.
//!
//! # Responsibilities
//! - Require name, user and password before any network I/O
//! - Derive the SSL mode from the settings
//! - Open the pool with statement logging disabled

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::ConnectOptions;
use thiserror::Error;

use crate::config::schema::DatabaseSettings;
use crate::config::validation::ConfigError;

/// Maximum pool connections.
const POOL_MAX: u32 = 10;
/// Connection acquire timeout.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
}

/// SSL settings used to connect to Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    Require,
    /// SSL with the server certificate checked against a root certificate.
    VerifyCa,
}

impl SslMode {
    pub fn from_settings(settings: &DatabaseSettings) -> Self {
        if settings.disable_ssl {
            SslMode::Disable
        } else if !settings.ssl_root_cert.is_empty() {
            SslMode::VerifyCa
        } else {
            SslMode::Require
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
        }
    }
}

/// Build validated connection options.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, ConfigError> {
    settings.validate()?;

    let mut options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(SslMode::from_settings(settings).into());

    if !settings.ssl_root_cert.is_empty() {
        options = options.ssl_root_cert(&settings.ssl_root_cert);
    }
    if !settings.ssl_cert.is_empty() {
        options = options.ssl_client_cert(&settings.ssl_cert);
    }
    if !settings.ssl_key.is_empty() {
        options = options.ssl_client_key(&settings.ssl_key);
    }

    Ok(options.disable_statement_logging())
}

/// Connect a pool using the given settings.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DatabaseError> {
    let options = connect_options(settings)?;

    tracing::debug!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        ssl_mode = %SslMode::from_settings(settings),
        "Connecting to database"
    );

    PgPoolOptions::new()
        .max_connections(POOL_MAX)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connect)
}
