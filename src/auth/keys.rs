//! RSA key loading.
//!
//! # Responsibilities
//! - Read PEM encoded RSA keys (PKCS#1 or PKCS#8/SPKI) from disk
//! - Reject keys of the wrong kind before they reach the token code
//! - Sign and verify RS512 tokens
//!
//! # Design Decisions
//! - No caching: a key is read once per call, rotation means a restart
//! - Key material is held behind `Arc` so layers clone cheaply

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::JwtClaims;

/// Signing algorithm for all service tokens.
pub const ALGORITHM: Algorithm = Algorithm::RS512;

/// Which half of a key pair a file is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Private,
    Public,
}

impl KeyKind {
    fn accepts(self, label: &str) -> bool {
        match self {
            KeyKind::Private => matches!(label, "RSA PRIVATE KEY" | "PRIVATE KEY"),
            KeyKind::Public => matches!(label, "RSA PUBLIC KEY" | "PUBLIC KEY"),
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyKind::Private => "private",
            KeyKind::Public => "public",
        })
    }
}

/// Key loading errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} holds a {found} block, expected an RSA {expected} key", path.display())]
    WrongKind {
        path: PathBuf,
        expected: KeyKind,
        found: String,
    },

    #[error("failed to parse RSA {expected} key from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        expected: KeyKind,
        source: jsonwebtoken::errors::Error,
    },
}

/// Private key used to issue tokens.
#[derive(Clone)]
pub struct AuthPrivateKey {
    key: Arc<EncodingKey>,
}

/// Public key used to verify tokens.
#[derive(Clone)]
pub struct AuthPublicKey {
    key: Arc<DecodingKey>,
}

impl fmt::Debug for AuthPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPrivateKey").finish_non_exhaustive()
    }
}

impl fmt::Debug for AuthPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPublicKey").finish_non_exhaustive()
    }
}

impl AuthPrivateKey {
    /// Sign `claims` with RS512.
    pub fn sign(&self, claims: &JwtClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(ALGORITHM), claims, &self.key)
    }
}

impl AuthPublicKey {
    /// Verify an RS512 token and decode its claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        decode::<JwtClaims>(token, &self.key, &validation()).map(|data| data.claims)
    }
}

/// Validation rules: RS512 only, `exp`/`nbf` checked when present, audience ignored.
pub fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.required_spec_claims.clear();
    validation.validate_nbf = true;
    validation.validate_aud = false;
    validation
}

/// Read and parse an RSA private key from a PEM file.
pub fn load_private_key(path: impl AsRef<Path>) -> Result<AuthPrivateKey, KeyError> {
    let path = path.as_ref();
    let data = read_pem(path, KeyKind::Private)?;
    let key = EncodingKey::from_rsa_pem(&data).map_err(|source| KeyError::Parse {
        path: path.to_path_buf(),
        expected: KeyKind::Private,
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded RSA private key");
    Ok(AuthPrivateKey { key: Arc::new(key) })
}

/// Read and parse an RSA public key from a PEM file.
pub fn load_public_key(path: impl AsRef<Path>) -> Result<AuthPublicKey, KeyError> {
    let path = path.as_ref();
    let data = read_pem(path, KeyKind::Public)?;
    let key = DecodingKey::from_rsa_pem(&data).map_err(|source| KeyError::Parse {
        path: path.to_path_buf(),
        expected: KeyKind::Public,
        source,
    })?;
    tracing::debug!(path = %path.display(), "Loaded RSA public key");
    Ok(AuthPublicKey { key: Arc::new(key) })
}

/// Read the file and check the PEM label against the expected kind.
/// Content without a PEM header is left for the parser to reject.
fn read_pem(path: &Path, expected: KeyKind) -> Result<Vec<u8>, KeyError> {
    let data = fs::read(path).map_err(|source| KeyError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(label) = pem_label(&data) {
        if !expected.accepts(label) {
            return Err(KeyError::WrongKind {
                path: path.to_path_buf(),
                expected,
                found: label.to_string(),
            });
        }
    }

    Ok(data)
}

fn pem_label(data: &[u8]) -> Option<&str> {
    const BEGIN: &str = "-----BEGIN ";
    let text = std::str::from_utf8(data).ok()?;
    let start = text.find(BEGIN)? + BEGIN.len();
    let len = text[start..].find("-----")?;
    Some(&text[start..start + len])
}
