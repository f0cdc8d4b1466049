use crate::claims::{Claims, Principal, TokenKind, TokenPair};
use crate::error::{Result, TokenError};
use crate::secret::SecretKey;
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// Constants
// ============================================================================

/// JWT algorithm - tokens naming any other algorithm are rejected
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

// ============================================================================
// Lifetimes
// ============================================================================

/// Expiration policy applied at issuance, one duration per token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn new(access: Duration, refresh: Duration) -> Self {
        Self { access, refresh }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL)
    }
}

fn to_time_delta(kind: TokenKind, lifetime: Duration) -> Result<TimeDelta> {
    if lifetime.is_zero() {
        return Err(TokenError::Configuration(format!(
            "{kind} token lifetime must be greater than zero"
        )));
    }

    TimeDelta::from_std(lifetime).map_err(|_| {
        TokenError::Configuration(format!("{kind} token lifetime is out of range"))
    })
}

// ============================================================================
// Engine
// ============================================================================

/// Issues and verifies HS256-signed tokens under a single shared secret
///
/// Every operation is a pure computation over the immutable key material,
/// the token bytes and the clock, so one engine can be shared across tasks
/// behind an `Arc` without locking.
///
/// ## Security Design
///
/// - **HS256 ONLY**: tokens whose header names another algorithm are invalid
/// - **Exact expiry**: no leeway, a token is expired from its `exp` second on
/// - **Stateless**: no server-side token store
#[derive(Clone)]
pub struct TokenEngine {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl TokenEngine {
    /// Build an engine from a raw secret string
    ///
    /// ## Errors
    ///
    /// Returns `TokenError::Configuration` if the secret is shorter than
    /// five characters or a lifetime is zero or out of range.
    pub fn new(secret: impl Into<String>, lifetimes: TokenLifetimes) -> Result<Self> {
        let secret = SecretKey::new(secret)?;
        Self::from_secret_key(&secret, lifetimes)
    }

    /// Build an engine with the default lifetimes (1 hour access, 30 days refresh)
    pub fn with_defaults(secret: impl Into<String>) -> Result<Self> {
        Self::new(secret, TokenLifetimes::default())
    }

    /// Build an engine from an already validated secret
    pub fn from_secret_key(secret: &SecretKey, lifetimes: TokenLifetimes) -> Result<Self> {
        let access_ttl = to_time_delta(TokenKind::Access, lifetimes.access)?;
        let refresh_ttl = to_time_delta(TokenKind::Refresh, lifetimes.refresh)?;

        let mut validation = Validation::new(JWT_ALGORITHM);
        // Expiry is checked in verify_at against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        info!(
            algorithm = ?JWT_ALGORITHM,
            access_ttl_secs = access_ttl.num_seconds(),
            refresh_ttl_secs = refresh_ttl.num_seconds(),
            "Token engine initialized"
        );

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    fn ttl(&self, kind: TokenKind) -> TimeDelta {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    // ------------------------------------------------------------------------
    // Issuance
    // ------------------------------------------------------------------------

    /// Issue a token of the given kind as of `now`
    ///
    /// ## Errors
    ///
    /// Returns `TokenError::Encoding` if the claims cannot be serialized or
    /// signed. Callers should treat this as an internal failure.
    pub fn issue_at(
        &self,
        kind: TokenKind,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let claims = Claims::new(principal.clone(), kind, now, self.ttl(kind))?;

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(format!("failed to sign {kind} token: {e}")))?;

        debug!(principal = %principal, kind = %kind, exp = claims.exp, "Token issued");
        Ok(token)
    }

    /// Issue an access token for `principal`
    pub fn issue_access(&self, principal: &Principal) -> Result<String> {
        self.issue_at(TokenKind::Access, principal, Utc::now())
    }

    /// Issue a refresh token for `principal`
    pub fn issue_refresh(&self, principal: &Principal) -> Result<String> {
        self.issue_at(TokenKind::Refresh, principal, Utc::now())
    }

    pub fn issue_pair_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_at(TokenKind::Access, principal, now)?,
            refresh_token: self.issue_at(TokenKind::Refresh, principal, now)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Issue an access/refresh pair in one call
    pub fn issue_pair(&self, principal: &Principal) -> Result<TokenPair> {
        self.issue_pair_at(principal, Utc::now())
    }

    // ------------------------------------------------------------------------
    // Verification
    // ------------------------------------------------------------------------

    /// Verify a token against the secret and the supplied clock
    ///
    /// ## Errors
    ///
    /// - `TokenError::InvalidToken`: malformed encoding, unexpected algorithm,
    ///   signature mismatch or unparsable claims
    /// - `TokenError::ExpiredToken`: the token is well formed and correctly
    ///   signed but `now` is at or past its expiration
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Token rejected");
                TokenError::InvalidToken
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            debug!(principal = %claims.sub, exp = claims.exp, "Token expired");
            return Err(TokenError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    // ------------------------------------------------------------------------
    // Renewal
    // ------------------------------------------------------------------------

    /// Exchange a refresh token for a new pair as of `now`
    ///
    /// ## Errors
    ///
    /// Returns the verification error for bad or expired tokens, and
    /// `TokenError::WrongTokenKind` if an access token is presented.
    pub fn renew_at(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<TokenPair> {
        let claims = self.verify_refresh_at(refresh_token, now)?;
        self.issue_pair_at(&claims.sub, now)
    }

    /// Verify a token and require it to be a refresh token
    ///
    /// Lets callers check the principal before issuing a pair with
    /// `issue_pair_at` under the same `now`.
    pub fn verify_refresh_at(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let claims = self.verify_at(refresh_token, now)?;

        if !claims.is_refresh_token() {
            return Err(TokenError::WrongTokenKind {
                expected: TokenKind::Refresh,
                found: claims.token_type,
            });
        }

        Ok(claims)
    }

    /// Exchange a refresh token for a new pair
    pub fn renew(&self, refresh_token: &str) -> Result<TokenPair> {
        self.renew_at(refresh_token, Utc::now())
    }
}

impl fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEngine")
            .field("algorithm", &JWT_ALGORITHM)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
