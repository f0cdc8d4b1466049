//! Request Extension Trait for Claims Access
//!
//! Handlers read what the gate attached to the call through `ClaimsExt`.

use crate::gate::UNAUTHORIZED_MESSAGE;
use jwt_core::{Claims, Principal};
use tonic::{Request, Status};

/// Extension trait for accessing verified claims from gRPC requests
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_access_gate::ClaimsExt;
/// use tonic::{Request, Response, Status};
///
/// async fn list_companies(request: Request<()>) -> Result<Response<()>, Status> {
///     let claims = request.require_access_token()?;
///     tracing::info!(principal = %claims.sub, "Listing companies");
///     Ok(Response::new(()))
/// }
/// ```
pub trait ClaimsExt {
    /// Claims stored by the gate
    ///
    /// ## Errors
    ///
    /// Returns `Status::permission_denied` when the call did not pass through
    /// the gate or targeted a public method.
    fn claims(&self) -> Result<&Claims, Status>;

    /// Principal the verified token was issued to
    fn principal(&self) -> Result<&Principal, Status>;

    /// Require that the call was made with an access token
    ///
    /// The gate admits any valid token; handlers that must not be reachable
    /// with a refresh token call this first.
    fn require_access_token(&self) -> Result<&Claims, Status>;
}

impl<T> ClaimsExt for Request<T> {
    fn claims(&self) -> Result<&Claims, Status> {
        self.extensions()
            .get::<Claims>()
            .ok_or_else(|| Status::permission_denied(UNAUTHORIZED_MESSAGE))
    }

    fn principal(&self) -> Result<&Principal, Status> {
        self.claims().map(Claims::principal)
    }

    fn require_access_token(&self) -> Result<&Claims, Status> {
        let claims = self.claims()?;

        if !claims.is_access_token() {
            return Err(Status::permission_denied(
                "access token required (refresh tokens not allowed)",
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jwt_core::TokenKind;

    fn claims(kind: TokenKind) -> Claims {
        Claims {
            sub: Principal::new("alice"),
            iat: 0,
            exp: 60,
            token_type: kind,
        }
    }

    #[test]
    fn test_claims_missing() {
        let request = Request::new(());

        let status = request.claims().unwrap_err();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
        assert_eq!(status.message(), UNAUTHORIZED_MESSAGE);
        assert!(request.principal().is_err());
    }

    #[test]
    fn test_claims_present() {
        let mut request = Request::new(());
        request.extensions_mut().insert(claims(TokenKind::Access));

        assert_eq!(request.claims().unwrap(), &claims(TokenKind::Access));
        assert_eq!(request.principal().unwrap().as_str(), "alice");
        assert!(request.require_access_token().is_ok());
    }

    #[test]
    fn test_require_access_token_rejects_refresh() {
        let mut request = Request::new(());
        request.extensions_mut().insert(claims(TokenKind::Refresh));

        assert!(request.claims().is_ok());
        let status = request.require_access_token().unwrap_err();
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
        assert!(status.message().contains("access token required"));
    }
}
