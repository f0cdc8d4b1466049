//! Signed token engine for the company service
//!
//! Issues and verifies HS256 JWTs under a single shared secret. Two token
//! kinds exist, *access* and *refresh*, which differ only in the lifetime
//! applied at issuance.
//!
//! ## Core Components
//!
//! - **TokenEngine**: issue, verify and renew tokens
//! - **SecretKey**: validated signing secret (minimum 5 characters)
//! - **Claims / Principal / TokenKind**: the signed payload
//! - **TokenError**: `InvalidToken` / `ExpiredToken` verification outcomes
//!   plus configuration and encoding failures
//!
//! ## Usage Example
//!
//! ```rust
//! use jwt_core::{Principal, TokenEngine, TokenError, TokenLifetimes};
//!
//! # fn main() -> Result<(), TokenError> {
//! let engine = TokenEngine::new("change-me-in-production", TokenLifetimes::default())?;
//!
//! let principal = Principal::new("alice");
//! let token = engine.issue_access(&principal)?;
//!
//! let claims = engine.verify(&token)?;
//! assert_eq!(claims.principal(), &principal);
//! # Ok(())
//! # }
//! ```
//!
//! Verification is a pure function of the token, the secret and the clock;
//! `verify_at` / `issue_at` take the clock explicitly.

mod claims;
mod engine;
mod error;
mod secret;

pub use claims::{Claims, Principal, TokenKind, TokenPair};
pub use engine::{TokenEngine, TokenLifetimes};
pub use error::{Result, TokenError};
pub use secret::{SecretKey, MIN_SECRET_LENGTH};
