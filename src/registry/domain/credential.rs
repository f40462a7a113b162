//! Salted one-way credential storage.
//!
//! Agents authenticate with an API key presented at registration. Only a
//! salted SHA-256 digest of the key is ever stored; verification recomputes
//! the derivation and compares in constant time, never via string equality.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Salted one-way digest of an agent API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredential {
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl ApiCredential {
    /// Derives a credential from a presented key with a fresh random salt.
    #[must_use]
    pub fn derive(presented_key: &str) -> Self {
        let salt = Uuid::new_v4().into_bytes().to_vec();
        let digest = Self::digest_with_salt(&salt, presented_key);
        Self { salt, digest }
    }

    /// Verifies a presented key against the stored derivation.
    ///
    /// Recomputes the salted digest and compares it with
    /// [`subtle::ConstantTimeEq`] to avoid timing leaks.
    #[must_use]
    pub fn verify(&self, presented_key: &str) -> bool {
        let candidate = Self::digest_with_salt(&self.salt, presented_key);
        bool::from(candidate.as_slice().ct_eq(self.digest.as_slice()))
    }

    fn digest_with_salt(salt: &[u8], presented_key: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(presented_key.as_bytes());
        hasher.finalize().to_vec()
    }
}
