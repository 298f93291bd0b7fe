//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Hold the Axum router services add their routes to
//! - Wire up the cross-cutting middleware (tracing, request ID, trailing
//!   slash normalization, panic recovery)
//! - Serve on a listener until shutdown

use std::future::Future;

use axum::routing::MethodRouter;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// HTTP server handed to services through the environment.
#[derive(Clone, Default)]
pub struct HttpServer {
    router: Router,
    middleware: bool,
}

impl HttpServer {
    /// A bare server without the cross-cutting middleware.
    pub fn new() -> Self {
        Self::default()
    }

    /// A server with request tracing, `x-request-id` handling, trailing
    /// slash stripping and panic-to-500 recovery.
    pub fn configured() -> Self {
        Self {
            router: Router::new(),
            middleware: true,
        }
    }

    /// Add a route.
    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> &mut Self {
        self.router = std::mem::take(&mut self.router).route(path, method_router);
        self
    }

    /// Merge a service's router into the server.
    pub fn mount(&mut self, routes: Router) -> &mut Self {
        self.router = std::mem::take(&mut self.router).merge(routes);
        self
    }

    /// Whether the cross-cutting middleware is installed.
    pub fn is_configured(&self) -> bool {
        self.middleware
    }

    /// The complete application service.
    ///
    /// Middleware wraps the routes from the outside, so paths are normalized
    /// before routing and routes added after construction are covered too.
    pub fn app(&self) -> Router {
        if !self.middleware {
            return self.router.clone();
        }

        Router::new()
            .fallback_service(self.router.clone())
            .layer(CatchPanicLayer::new())
            .layer(NormalizePathLayer::trim_trailing_slash())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
