//! Example service built on the bootstrap.
//!
//! ```text
//! flags / env / --config
//!     → Settings
//!     → Environment (object store, database, keys, HTTP server)
//!     → routes registered by the service
//!     → run until Ctrl+C → destroy
//! ```
//!
//! `GET /` answers without authentication. `GET /me` is mounted when a public
//! key is configured and echoes the caller's token claims.

use axum::routing::get;
use axum::{Extension, Json, Router};

use service_base::config::resolve_settings;
use service_base::observability::logging;
use service_base::{Environment, JwtClaims};

/// The service holds its environment instead of extending it.
struct HelloService {
    env: Environment,
}

impl HelloService {
    fn new(mut env: Environment) -> Self {
        let mut routes = Router::new().route("/", get(hello));
        if env.auth_public_key.is_some() {
            routes = routes.merge(Router::new().route("/me", get(me)).route_layer(env.jwt_layer()));
        }
        env.server.mount(routes);
        Self { env }
    }
}

async fn hello() -> &'static str {
    "Hello, World!"
}

async fn me(Extension(claims): Extension<JwtClaims>) -> Json<JwtClaims> {
    Json(claims)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);

    let settings = resolve_settings()?;
    tracing::info!("service-base v0.1.0 starting");

    let mut service = HelloService::new(Environment::must(settings).await);

    let result = service.env.run().await;
    service.env.destroy().await;
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}
