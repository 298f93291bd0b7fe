//! Token authentication subsystem.
//!
//! # Data Flow
//! ```text
//! PEM files on disk
//!     → keys.rs (read, check kind, parse)
//!     → AuthPrivateKey (sign) / AuthPublicKey (verify)
//!
//! Incoming request
//!     → middleware.rs (extract bearer token, verify RS512)
//!     → claims.rs (JwtClaims inserted into request extensions)
//!     → handler
//! ```
//!
//! # Design Decisions
//! - RS512 only; tokens signed with any other algorithm are rejected
//! - Middleware is stateless apart from the shared public key

pub mod claims;
pub mod keys;
pub mod middleware;

pub use claims::{JwtClaims, RegisteredClaims};
pub use keys::{load_private_key, load_public_key, AuthPrivateKey, AuthPublicKey, KeyError, KeyKind};
pub use middleware::{AuthRejection, JwtLayer, JwtMiddleware};
