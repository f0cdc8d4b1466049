use crate::claims::TokenKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

/// Failures produced by the token engine
///
/// `InvalidToken` and `ExpiredToken` are verification outcomes and are
/// the only variants `verify` returns. Callers that expose them over the
/// wire should collapse both into a single denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("invalid token configuration: {0}")]
    Configuration(String),

    #[error("expected {expected} token, got {found} token")]
    WrongTokenKind {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("failed to encode token: {0}")]
    Encoding(String),
}
