//! Tower Layer integration for the access gate
//!
//! Tonic interceptors never see the method path, so the gate runs one level
//! lower on the raw `http::Request` where `uri().path()` is `/Service/Method`.

use crate::gate::{AccessGate, GateDecision, GateError};
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tonic::Status;
use tower::{Layer, Service};
use tracing::error;

const GRPC_CONTENT_TYPE: &str = "application/grpc";

/// Access Gate Layer for tonic servers
///
/// ```rust,no_run
/// # use grpc_access_gate::{AccessGate, AccessGateLayer};
/// # async fn example(gate: AccessGate) -> Result<(), Box<dyn std::error::Error>> {
/// let (_reporter, health) = tonic_health::server::health_reporter();
///
/// tonic::transport::Server::builder()
///     .layer(AccessGateLayer::new(gate))
///     .add_service(health)
///     .serve("0.0.0.0:50051".parse()?)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AccessGateLayer {
    gate: AccessGate,
}

impl AccessGateLayer {
    pub fn new(gate: AccessGate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for AccessGateLayer {
    type Service = AccessGateService<S>;

    fn layer(&self, service: S) -> Self::Service {
        AccessGateService {
            inner: service,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessGateService<S> {
    inner: S,
    gate: AccessGate,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for AccessGateService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        match self.gate.authorize(req.uri().path(), req.headers()) {
            Ok(GateDecision::Public) => Box::pin(self.inner.call(req)),
            Ok(GateDecision::Authenticated(claims)) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.inner.call(req))
            }
            Err(err) => Box::pin(std::future::ready(Ok(denial_response(err)))),
        }
    }
}

/// Trailers-only gRPC response carrying the denial status
fn denial_response<B: Default>(err: GateError) -> http::Response<B> {
    let status = Status::from(err);
    let mut response = http::Response::new(B::default());

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(GRPC_CONTENT_TYPE));
    if let Err(e) = status.add_header(headers) {
        error!(error = %e, "Failed to encode denial status");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{PERMISSION_DENIED_MESSAGE, UNAUTHORIZED_MESSAGE};
    use crate::policy::RoutePolicy;
    use jwt_core::{Claims, Principal, TokenEngine};
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tower::{service_fn, ServiceExt};

    fn gate() -> AccessGate {
        let engine = TokenEngine::with_defaults("layer-unit-test-secret").unwrap();
        AccessGate::new(
            Arc::new(engine),
            RoutePolicy::from_public_methods(["/CompanyService/Login"]),
        )
    }

    fn request(path: &str, token: Option<&str>) -> http::Request<()> {
        let mut builder = http::Request::builder().uri(format!("http://localhost{path}"));
        if let Some(token) = token {
            builder = builder.header("authorization", token);
        }
        builder.body(()).unwrap()
    }

    fn denial_of(response: &http::Response<String>) -> Status {
        Status::from_header_map(response.headers()).expect("grpc-status header")
    }

    #[tokio::test]
    async fn test_denied_call_never_reaches_inner() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let inner = service_fn(move |_req: http::Request<()>| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, Infallible>(http::Response::new("handled".to_string())) }
        });

        let mut service = AccessGateLayer::new(gate()).layer(inner);

        let response = service
            .ready()
            .await
            .unwrap()
            .call(request("/CompanyService/List", None))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            GRPC_CONTENT_TYPE
        );
        assert_eq!(response.headers().get("grpc-status").unwrap(), "7");
        assert!(response.body().is_empty());

        let status = denial_of(&response);
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
        assert_eq!(status.message(), UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalid_token_denial_message() {
        let inner = service_fn(|_req: http::Request<()>| async {
            Ok::<_, Infallible>(http::Response::new("handled".to_string()))
        });

        let response = AccessGateLayer::new(gate())
            .layer(inner)
            .oneshot(request("/CompanyService/List", Some("forged")))
            .await
            .unwrap();

        let status = denial_of(&response);
        assert_eq!(status.code(), tonic::Code::PermissionDenied);
        assert_eq!(status.message(), PERMISSION_DENIED_MESSAGE);
    }

    #[tokio::test]
    async fn test_public_call_passes_without_claims() {
        let inner = service_fn(|req: http::Request<()>| async move {
            let has_claims = req.extensions().get::<Claims>().is_some();
            Ok::<_, Infallible>(http::Response::new(has_claims.to_string()))
        });

        let response = AccessGateLayer::new(gate())
            .layer(inner)
            .oneshot(request("/CompanyService/Login", None))
            .await
            .unwrap();

        assert_eq!(response.body(), "false");
        assert!(response.headers().get("grpc-status").is_none());
    }

    #[tokio::test]
    async fn test_authenticated_call_carries_claims() {
        let gate = gate();
        let token = gate.engine().issue_access(&Principal::new("alice")).unwrap();

        let inner = service_fn(|req: http::Request<()>| async move {
            let principal = req
                .extensions()
                .get::<Claims>()
                .map(|claims| claims.principal().to_string())
                .unwrap_or_default();
            Ok::<_, Infallible>(http::Response::new(principal))
        });

        let response = AccessGateLayer::new(gate)
            .layer(inner)
            .oneshot(request("/CompanyService/List", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.body(), "alice");
    }
}
