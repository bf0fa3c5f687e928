//! Pluggable one-way credential hashing.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// One-way function applied to secrets before storage and on login.
pub trait CredentialHasher {
    fn hash(&self, secret: &str) -> String;

    /// Compares `secret` against a stored hash without early exit.
    fn verify(&self, secret: &str, stored_hash: &str) -> bool {
        constant_time_str_eq(&self.hash(secret), stored_hash)
    }
}

/// Unsalted SHA-256, lowercase hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl CredentialHasher for Sha256Hasher {
    fn hash(&self, secret: &str) -> String {
        Sha256::digest(secret.as_bytes())
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }
}

pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
