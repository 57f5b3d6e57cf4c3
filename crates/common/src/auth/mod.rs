//! Shared-credential check for administrative operations
//!
//! The engine only ever sees a boolean `authorized` flag; this is where the
//! gateway turns a presented header value into that flag.

use sha2::{Digest, Sha256};

/// Hashed shared credential
#[derive(Clone)]
pub struct SharedCredential {
    digest: Option<[u8; 32]>,
}

impl SharedCredential {
    /// Build from the configured token. A blank or missing token authorizes nobody.
    pub fn new(token: Option<&str>) -> Self {
        let digest = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(hash_token);
        Self { digest }
    }

    /// Whether a credential is configured at all
    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// Check a presented token
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match (&self.digest, presented) {
            (Some(expected), Some(presented)) => {
                let presented = hash_token(presented.trim());
                // Fixed-length digests, compared without early exit
                expected
                    .iter()
                    .zip(presented.iter())
                    .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                    == 0
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for SharedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCredential")
            .field("configured", &self.is_configured())
            .finish()
    }
}

fn hash_token(token: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(token.as_bytes()));
    out
}
