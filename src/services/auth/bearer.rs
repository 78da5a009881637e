//! Static bearer secret for trusted service-to-service callers.
//!
//! A request carrying `Authorization: Bearer <DASHBOARD_TOKEN>` is admitted
//! without a session and without any role check.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

const BEARER_PREFIX: &str = "Bearer ";

/// Configured bearer secret.
///
/// Only the SHA-256 digest of the secret is kept, so comparisons run over
/// fixed-length values and the secret itself is never printable via Debug.
#[derive(Clone)]
pub struct BearerSecret {
    digest: Option<[u8; 32]>,
}

impl std::fmt::Debug for BearerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerSecret")
            .field("configured", &self.digest.is_some())
            .finish()
    }
}

impl BearerSecret {
    /// An empty secret is treated as "not configured" and never matches.
    pub fn new(secret: &str) -> Self {
        let digest = (!secret.is_empty()).then(|| Sha256::digest(secret.as_bytes()).into());
        Self { digest }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    /// Exact byte-for-byte comparison against a raw token.
    pub fn matches(&self, token: &str) -> bool {
        let Some(expected) = &self.digest else {
            return false;
        };
        let actual: [u8; 32] = Sha256::digest(token.as_bytes()).into();
        actual == *expected
    }

    /// Checks the `Authorization` header. Anything malformed is simply "no match".
    pub fn matches_headers(&self, headers: &HeaderMap) -> bool {
        extract_bearer(headers).is_some_and(|token| self.matches(token))
    }
}

/// Token following a case-sensitive `Bearer ` prefix, untrimmed.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}
