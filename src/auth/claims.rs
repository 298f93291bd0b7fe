//! Token claims.

use std::time::Duration;

use jsonwebtoken::get_current_timestamp;
use serde::{Deserialize, Serialize};

/// Claims carried by service tokens: identity fields plus the registered
/// RFC 7519 claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Administrator flag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub admin: bool,

    /// Free-form context set by the issuer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,

    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

/// Registered claim names. All optional; `exp` and `nbf` are enforced when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl JwtClaims {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Stamp `iat` with the current time and `exp` with `iat + ttl`.
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        let now = get_current_timestamp();
        self.registered.iat = Some(now);
        self.registered.exp = Some(now.saturating_add(ttl.as_secs()));
        self
    }
}
