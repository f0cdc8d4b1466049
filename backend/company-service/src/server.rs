//! gRPC server assembly
//!
//! Every service registered here sits behind the access gate.

use crate::config::Settings;
use crate::error::{Result, ServiceError};
use crate::grpc::pb::company_service_server::CompanyServiceServer;
use crate::grpc::CompanyServer;
use crate::session::SessionService;
use crate::users::InMemoryUserDirectory;
use grpc_access_gate::{AccessGate, AccessGateLayer};
use jwt_core::TokenEngine;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tracing::info;

/// Name reported to health checks for the company service
pub const SERVICE_NAME: &str = "CompanyService";

/// Shared state built once at startup
#[derive(Clone)]
pub struct AppState {
    pub gate: AccessGate,
    pub sessions: SessionService,
}

impl AppState {
    /// ## Errors
    ///
    /// Returns `ServiceError::Token` when the secret is shorter than five
    /// characters or a lifetime is out of range.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let engine = Arc::new(TokenEngine::new(
            settings.jwt.secret.clone(),
            settings.jwt.lifetimes(),
        )?);

        let policy = settings.routes.policy();
        info!(public_methods = ?policy.public_methods(), "Route policy loaded");

        let gate = AccessGate::new(engine.clone(), policy);
        let sessions = SessionService::new(Arc::new(InMemoryUserDirectory::new()), engine);

        Ok(Self {
            gate,
            sessions,
        })
    }
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let (mut reporter, health_service) = tonic_health::server::health_reporter();
    reporter
        .set_service_status(SERVICE_NAME, ServingStatus::Serving)
        .await;

    let company_service = CompanyServiceServer::new(CompanyServer::new(state.sessions));

    let incoming = TcpIncoming::from_listener(listener, true, None)
        .map_err(|e| ServiceError::Internal(format!("failed to accept connections: {}", e)))?;

    Server::builder()
        .layer(AccessGateLayer::new(state.gate))
        .add_service(health_service)
        .add_service(company_service)
        .serve_with_incoming_shutdown(incoming, shutdown)
        .await
        .map_err(|e| ServiceError::Internal(format!("gRPC server error: {}", e)))?;

    info!("gRPC server stopped");
    Ok(())
}
