use jwt_core::TokenError;
use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Convert to gRPC Status for wire protocol
    pub fn to_status(&self) -> Status {
        match self {
            ServiceError::UserNotFound => Status::new(Code::NotFound, "User not found"),
            ServiceError::UserAlreadyExists => {
                Status::new(Code::AlreadyExists, "User already exists")
            }
            ServiceError::InvalidUsername(msg) => {
                Status::new(Code::InvalidArgument, format!("Invalid username: {}", msg))
            }
            ServiceError::Token(TokenError::InvalidToken | TokenError::ExpiredToken) => {
                Status::new(Code::Unauthenticated, "Invalid or expired token")
            }
            ServiceError::Token(TokenError::WrongTokenKind { expected, .. }) => Status::new(
                Code::InvalidArgument,
                format!("A {} token is required", expected),
            ),
            ServiceError::Token(_) | ServiceError::Config(_) | ServiceError::Internal(_) => {
                // Don't leak internal details
                Status::new(Code::Internal, "Internal server error")
            }
        }
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::Config(err.to_string())
    }
}

// gRPC Status conversion
impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        err.to_status()
    }
}
