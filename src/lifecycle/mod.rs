//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → object store → database → keys → HTTP server → Environment
//!
//! Run:
//!     Environment::run → serve until signals.rs (Ctrl+C)
//!     Environment::run_until → serve until shutdown.rs fires
//!
//! Teardown:
//!     server stopped → Environment::destroy → database pool closed
//! ```
//!
//! # Design Decisions
//! - Ordered startup, fail fast on the first error
//! - Teardown needs `&mut Environment`, so it cannot overlap a running server

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{initialize, InitError};
