//! Shared-secret token check for the chat endpoint.

use std::fmt;

/// The configured API token.
///
/// Only the BLAKE3 digest of the secret is kept. `blake3::Hash` compares in
/// constant time, so checking a candidate does not leak how many leading
/// bytes matched.
#[derive(Clone)]
pub struct ApiToken(blake3::Hash);

impl ApiToken {
    pub fn new(secret: &str) -> Self {
        Self(blake3::hash(secret.as_bytes()))
    }

    /// True when `candidate` equals the configured secret.
    pub fn verify(&self, candidate: &str) -> bool {
        blake3::hash(candidate.as_bytes()) == self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}
