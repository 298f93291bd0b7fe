//! Configuration schema definitions.
//!
//! Every group derives `clap::Args` (flags with environment fallback) and the
//! Serde traits (TOML files). Defaults are identical on both paths.

use clap::Args;
use serde::{Deserialize, Serialize};

/// Root settings for a service.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    #[command(flatten)]
    pub database: DatabaseSettings,

    #[command(flatten)]
    pub object_store: ObjectStoreSettings,

    #[command(flatten)]
    pub auth: AuthSettings,

    #[command(flatten)]
    pub http: HttpSettings,
}

/// HTTP interface settings.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    /// HTTP listen address
    #[arg(long = "http", env = "HTTP", default_value = "127.0.0.1:8080")]
    pub listen_address: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Paths to the PEM encoded RSA keys used for tokens.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthSettings {
    /// Auth public key
    #[arg(long = "auth-public-key", env = "AUTH_PUBLIC_KEY", default_value = "")]
    pub public_key: String,

    /// Auth private key
    #[arg(long = "auth-private-key", env = "AUTH_PRIVATE_KEY", default_value = "")]
    pub private_key: String,
}

/// Object storage endpoint settings. An empty bucket disables the store.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectStoreSettings {
    /// Storage URL
    #[arg(long = "storage-url", env = "STORAGE_URL", default_value = "s3.amazonaws.com")]
    pub url: String,

    /// Storage region
    #[arg(long = "storage-region", env = "STORAGE_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Storage bucket
    #[arg(long = "storage-bucket", env = "STORAGE_BUCKET", default_value = "")]
    pub bucket: String,

    /// Storage disable SSL
    #[arg(id = "storage_disable_ssl", long = "storage-disable-ssl", env = "STORAGE_DISABLE_SSL")]
    pub disable_ssl: bool,
}

impl ObjectStoreSettings {
    pub fn enabled(&self) -> bool {
        !self.bucket.is_empty()
    }
}

impl Default for ObjectStoreSettings {
    fn default() -> Self {
        Self {
            url: "s3.amazonaws.com".to_string(),
            region: "us-east-1".to_string(),
            bucket: String::new(),
            disable_ssl: false,
        }
    }
}

/// Location and credentials of the application database.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// DB host address
    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    /// DB port
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,

    /// DB user
    #[arg(long = "db-user", env = "DB_USER", default_value = "")]
    pub user: String,

    /// DB password
    #[arg(long = "db-password", env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// DB name
    #[arg(long = "db-name", env = "DB_NAME", default_value = "")]
    pub name: String,

    /// DB disable SSL
    #[arg(id = "db_disable_ssl", long = "db-disable-ssl", env = "DB_DISABLE_SSL")]
    pub disable_ssl: bool,

    /// DB SSL root certificate
    #[arg(long = "db-ssl-root-cert", env = "DB_SSL_ROOT_CERT", default_value = "")]
    pub ssl_root_cert: String,

    /// DB SSL client certificate
    #[arg(long = "db-ssl-cert", env = "DB_SSL_CERT", default_value = "")]
    pub ssl_cert: String,

    /// DB SSL client key
    #[arg(long = "db-ssl-key", env = "DB_SSL_KEY", default_value = "")]
    pub ssl_key: String,
}

impl DatabaseSettings {
    /// A database is wanted once both host and port are set.
    pub fn enabled(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: String::new(),
            password: String::new(),
            name: String::new(),
            disable_ssl: false,
            ssl_root_cert: String::new(),
            ssl_cert: String::new(),
            ssl_key: String::new(),
        }
    }
}
