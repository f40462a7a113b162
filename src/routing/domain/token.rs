//! Session integrity tokens.
//!
//! A token is the SHA-256 digest of the session id, a process-wide secret,
//! and a per-session creation nonce, issued to the caller in hex form.
//! Verification recomputes nothing; the stored hex form is compared against
//! the presented value in constant time.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::routing::domain::SessionId;

/// Process-wide secret mixed into every integrity token.
///
/// Injected at construction; the debug form never reveals the material.
#[derive(Clone)]
pub struct RouterSecret(Vec<u8>);

impl RouterSecret {
    /// Wraps existing secret material.
    #[must_use]
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self(material.into())
    }

    /// Generates fresh random secret material.
    #[must_use]
    pub fn generate() -> Self {
        let mut material = Vec::with_capacity(32);
        material.extend_from_slice(Uuid::new_v4().as_bytes());
        material.extend_from_slice(Uuid::new_v4().as_bytes());
        Self(material)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for RouterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RouterSecret(..)")
    }
}

/// One-way integrity token carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrityToken(String);

impl IntegrityToken {
    /// Derives the token for a session.
    #[must_use]
    pub fn derive(session_id: SessionId, secret: &RouterSecret, nonce: Uuid) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(session_id.into_inner().as_bytes());
        hasher.update(secret.as_bytes());
        hasher.update(nonce.as_bytes());
        Self(to_hex(&hasher.finalize()))
    }

    /// Hex form issued to the caller.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Compares a presented token in constant time.
    #[must_use]
    pub fn verify(&self, presented: &str) -> bool {
        bool::from(presented.as_bytes().ct_eq(self.0.as_bytes()))
    }
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // infallible for String
        let _ = write!(out, "{byte:02x}");
    }
    out
}
