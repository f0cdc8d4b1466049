//! Integration tests for the access gate
//!
//! Runs a real tonic server (the standard health service) behind the gate
//! and calls it over loopback TCP.

use grpc_access_gate::{
    AccessGate, AccessGateLayer, ClaimsExt, CredentialInterceptor, RoutePolicy,
    PERMISSION_DENIED_MESSAGE, UNAUTHORIZED_MESSAGE,
};
use jwt_core::{Principal, TokenEngine, TokenKind, TokenLifetimes};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::transport::server::TcpIncoming;
use tonic::transport::{Channel, Server};
use tonic::Code;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use tonic_health::pb::HealthCheckRequest;
use tower::{service_fn, Layer, ServiceExt};

const SECRET: &str = "integration-gate-secret";
const HEALTH_CHECK: &str = "/grpc.health.v1.Health/Check";

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn engine() -> Arc<TokenEngine> {
    let lifetimes = TokenLifetimes::new(Duration::from_secs(60), Duration::from_secs(600));
    Arc::new(TokenEngine::new(SECRET, lifetimes).expect("Failed to build engine"))
}

async fn spawn_server(policy: RoutePolicy) -> TestServer {
    let gate = AccessGate::new(engine(), policy);
    let (_reporter, health) = tonic_health::server::health_reporter();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let incoming = TcpIncoming::from_listener(listener, true, None).unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        Server::builder()
            .layer(AccessGateLayer::new(gate))
            .add_service(health)
            .serve_with_incoming_shutdown(incoming, async {
                let _ = rx.await;
            })
            .await
            .unwrap();
    });

    TestServer {
        addr,
        shutdown: Some(tx),
    }
}

async fn channel(addr: SocketAddr) -> Channel {
    Channel::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .expect("Failed to connect")
}

#[tokio::test]
async fn test_public_method_without_credential() {
    let server = spawn_server(RoutePolicy::from_public_methods([HEALTH_CHECK])).await;
    let mut client = HealthClient::new(channel(server.addr).await);

    let response = client
        .check(HealthCheckRequest::default())
        .await
        .expect("public call should pass");

    assert_eq!(response.into_inner().status, ServingStatus::Serving as i32);
}

#[tokio::test]
async fn test_protected_method_without_credential() {
    let server = spawn_server(RoutePolicy::new()).await;
    let mut client = HealthClient::new(channel(server.addr).await);

    let status = client
        .check(HealthCheckRequest::default())
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::PermissionDenied);
    assert_eq!(status.message(), UNAUTHORIZED_MESSAGE);
}

#[tokio::test]
async fn test_protected_method_with_valid_token() {
    let server = spawn_server(RoutePolicy::new()).await;
    let token = engine().issue_access(&Principal::new("alice")).unwrap();

    let interceptor = CredentialInterceptor::new(token).unwrap();
    let mut client = HealthClient::with_interceptor(channel(server.addr).await, interceptor);

    let response = client
        .check(HealthCheckRequest::default())
        .await
        .expect("authenticated call should pass");

    assert_eq!(response.into_inner().status, ServingStatus::Serving as i32);
}

#[tokio::test]
async fn test_protected_method_with_expired_token() {
    let server = spawn_server(RoutePolicy::new()).await;
    let issued = chrono::Utc::now() - chrono::TimeDelta::seconds(120);
    let token = engine()
        .issue_at(TokenKind::Access, &Principal::new("alice"), issued)
        .unwrap();

    let interceptor = CredentialInterceptor::new(token).unwrap();
    let mut client = HealthClient::with_interceptor(channel(server.addr).await, interceptor);

    let status = client
        .check(HealthCheckRequest::default())
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::PermissionDenied);
    assert_eq!(status.message(), PERMISSION_DENIED_MESSAGE);
}

#[tokio::test]
async fn test_protected_method_with_foreign_token() {
    let server = spawn_server(RoutePolicy::new()).await;
    let foreign = TokenEngine::with_defaults("some-other-secret").unwrap();
    let token = foreign.issue_access(&Principal::new("mallory")).unwrap();

    let interceptor = CredentialInterceptor::new(token).unwrap();
    let mut client = HealthClient::with_interceptor(channel(server.addr).await, interceptor);

    let status = client
        .check(HealthCheckRequest::default())
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::PermissionDenied);
    assert_eq!(status.message(), PERMISSION_DENIED_MESSAGE);
}

/// Claims attached by the layer are visible after conversion to `tonic::Request`
#[tokio::test]
async fn test_handler_reads_claims_from_tonic_request() {
    let engine = engine();
    let gate = AccessGate::new(engine.clone(), RoutePolicy::new());
    let token = engine.issue_access(&Principal::new("alice")).unwrap();

    let handler = service_fn(|req: http::Request<()>| async move {
        let request = tonic::Request::from_http(req);
        let principal = match request.require_access_token() {
            Ok(claims) => claims.principal().to_string(),
            Err(status) => status.message().to_string(),
        };
        Ok::<_, Infallible>(http::Response::new(principal))
    });

    let req = http::Request::builder()
        .uri("http://localhost/CompanyService/List")
        .header("authorization", token)
        .body(())
        .unwrap();

    let response = AccessGateLayer::new(gate)
        .layer(handler)
        .oneshot(req)
        .await
        .unwrap();

    assert_eq!(response.body(), "alice");
}

#[tokio::test]
async fn test_refresh_token_passes_gate_but_not_access_check() {
    let engine = engine();
    let gate = AccessGate::new(engine.clone(), RoutePolicy::new());
    let token = engine.issue_refresh(&Principal::new("alice")).unwrap();

    let handler = service_fn(|req: http::Request<()>| async move {
        let request = tonic::Request::from_http(req);
        let outcome = match request.require_access_token() {
            Ok(_) => "allowed".to_string(),
            Err(status) => format!("{:?}", status.code()),
        };
        Ok::<_, Infallible>(http::Response::new(outcome))
    });

    let req = http::Request::builder()
        .uri("http://localhost/CompanyService/List")
        .header("authorization", token)
        .body(())
        .unwrap();

    let response = AccessGateLayer::new(gate)
        .layer(handler)
        .oneshot(req)
        .await
        .unwrap();

    assert_eq!(response.body(), "PermissionDenied");
}
