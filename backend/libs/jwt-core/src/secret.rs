//! Shared signing secret
//!
//! The secret is validated once at startup and never mutated afterwards.

use crate::error::{Result, TokenError};
use std::fmt;
use tracing::warn;
use zeroize::Zeroize;

/// Minimum secret length (in characters) accepted at construction
pub const MIN_SECRET_LENGTH: usize = 5;

/// Length below which HS256 keys are accepted but flagged (256 bits)
const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Symmetric key used to sign and verify every token
///
/// The backing buffer is zeroed on drop and never printed.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    /// Validate and wrap a secret
    ///
    /// ## Errors
    ///
    /// Returns `TokenError::Configuration` if the secret has fewer than
    /// `MIN_SECRET_LENGTH` characters.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let mut secret = secret.into();

        if secret.chars().count() < MIN_SECRET_LENGTH {
            secret.zeroize();
            return Err(TokenError::Configuration(format!(
                "invalid key size: must be at least {MIN_SECRET_LENGTH} characters"
            )));
        }

        if secret.len() < RECOMMENDED_SECRET_BYTES {
            warn!(
                length = secret.len(),
                recommended = RECOMMENDED_SECRET_BYTES,
                "JWT secret is shorter than recommended for HS256"
            );
        }

        Ok(Self(secret))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(**redacted**)")
    }
}
