//! Client-side credential interceptor
//!
//! Puts the raw token under `authorization` on every outgoing call.

use crate::gate::AUTHORIZATION_METADATA_KEY;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Interceptor that attaches a token to outgoing gRPC requests
///
/// The value is sent as-is, without a `Bearer ` scheme prefix.
///
/// ```rust,no_run
/// use grpc_access_gate::CredentialInterceptor;
/// use tonic::transport::Channel;
/// use tonic_health::pb::{health_client::HealthClient, HealthCheckRequest};
///
/// # async fn example(token: String) -> Result<(), Box<dyn std::error::Error>> {
/// let channel = Channel::from_static("http://[::1]:50051").connect().await?;
/// let interceptor = CredentialInterceptor::new(token)?;
///
/// let mut client = HealthClient::with_interceptor(channel, interceptor);
/// client.check(HealthCheckRequest::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CredentialInterceptor {
    credential: AsciiMetadataValue,
}

impl CredentialInterceptor {
    /// ## Errors
    ///
    /// Returns `Status::invalid_argument` if the token is not visible ASCII.
    /// Tokens issued by `jwt_core::TokenEngine` are base64url and always pass.
    pub fn new(token: impl Into<String>) -> Result<Self, Status> {
        // FromStr only admits visible ASCII; TryFrom<String> lets obs-text through
        let token: String = token.into();
        let credential = token
            .parse::<AsciiMetadataValue>()
            .map_err(|_| Status::invalid_argument("token contains invalid characters"))?;

        Ok(Self { credential })
    }
}

impl Interceptor for CredentialInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert(AUTHORIZATION_METADATA_KEY, self.credential.clone());
        Ok(request)
    }
}
