//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing` in every subsystem
//! - Per-request spans come from `tower_http::trace::TraceLayer`
//! - Request ID flows through the `x-request-id` header

pub mod logging;
