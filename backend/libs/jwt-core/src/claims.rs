//! Token payload types
//!
//! Claims carry only the principal name plus the registered timestamps.
//! Extended user records are never embedded in a token.

use crate::error::{Result, TokenError};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The caller a token asserts, identified by a unique human-readable name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Principal {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Token kind, distinguished only by the lifetime applied at issuance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authorizes ordinary calls
    Access,
    /// Exchanged for a fresh token pair
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed payload embedded in every token
///
/// ## Design Notes
///
/// - `sub` holds the principal name and nothing else
/// - `iat` / `exp` are Unix timestamps in seconds
/// - Immutable once issued; fields are public for read access only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal name)
    pub sub: Principal,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token kind ("access" or "refresh")
    pub token_type: TokenKind,
}

impl Claims {
    pub(crate) fn new(
        principal: Principal,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        lifetime: TimeDelta,
    ) -> Result<Self> {
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or_else(|| TokenError::Encoding("expiration time out of range".to_string()))?;

        Ok(Self {
            sub: principal,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            token_type: kind,
        })
    }

    pub fn principal(&self) -> &Principal {
        &self.sub
    }

    pub fn kind(&self) -> TokenKind {
        self.token_type
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenKind::Access
    }

    pub fn is_refresh_token(&self) -> bool {
        self.token_type == TokenKind::Refresh
    }

    /// A token is expired from its `exp` second onwards
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Token pair handed back after register, login or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}
