//! Shared-secret access control.

use std::fmt;
use subtle::ConstantTimeEq;

/// The process-wide API secret.
///
/// Built once from configuration and handed to the router, so tests can
/// inject their own secret.
#[derive(Clone)]
pub struct AccessPolicy {
    secret: String,
}

impl AccessPolicy {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check a request-supplied key against the secret.
    ///
    /// A missing key is always denied. Otherwise the key must equal the
    /// secret exactly; the byte comparison runs in constant time.
    pub fn authorized(&self, supplied: Option<&str>) -> bool {
        match supplied {
            Some(key) => key.as_bytes().ct_eq(self.secret.as_bytes()).into(),
            None => false,
        }
    }
}

impl fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("secret", &"<redacted>")
            .finish()
    }
}
