//! Password storage: salted SHA-256 digests compared in constant time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// A salted password digest. The plain password is never retained.
#[derive(Clone)]
pub struct PasswordDigest {
    salt: String,
    digest: [u8; 32],
}

impl PasswordDigest {
    /// Digest `password` under a fresh random salt.
    pub fn new(password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest(&salt, password);
        Self { salt, digest }
    }

    /// Whether `candidate` is the password this digest was made from.
    pub fn matches(&self, candidate: &str) -> bool {
        let computed = digest(&self.salt, candidate);
        bool::from(self.digest.ct_eq(&computed))
    }
}

impl std::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("digest", &"[REDACTED]")
            .finish()
    }
}

fn digest(salt: &str, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
