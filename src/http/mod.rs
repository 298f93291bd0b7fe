//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum, one task per connection)
//!     → SetRequestId → Trace → PropagateRequestId
//!     → NormalizePath (strip trailing slash) → CatchPanic
//!     → service routes (optionally behind auth::JwtLayer)
//! ```

pub mod server;

pub use server::HttpServer;
