//! CompanyService handlers
//!
//! Register and Login are on the public allow-list. Refresh goes through the
//! gate like any other call; the refresh token itself may be the credential.

use super::pb::company_service_server::CompanyService;
use super::pb::{CreateUserRequest, CreateUserResponse, LoginRequest, RefreshRequest};
use crate::error::ServiceError;
use crate::session::SessionService;
use tonic::{Request, Response, Status};
use tracing::{error, warn};

#[derive(Clone)]
pub struct CompanyServer {
    sessions: SessionService,
}

impl CompanyServer {
    pub fn new(sessions: SessionService) -> Self {
        Self { sessions }
    }
}

fn to_status(method: &'static str, err: ServiceError) -> Status {
    match &err {
        ServiceError::Config(_) | ServiceError::Internal(_) => {
            error!(method, error = %err, "Call failed")
        }
        _ => warn!(method, error = %err, "Call rejected"),
    }
    err.to_status()
}

#[tonic::async_trait]
impl CompanyService for CompanyServer {
    async fn register(
        &self,
        request: Request<CreateUserRequest>,
    ) -> std::result::Result<Response<CreateUserResponse>, Status> {
        let req = request.into_inner();
        let pair = self
            .sessions
            .register(&req.name)
            .await
            .map_err(|e| to_status("Register", e))?;

        Ok(Response::new(pair.into()))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> std::result::Result<Response<CreateUserResponse>, Status> {
        let req = request.into_inner();
        let pair = self
            .sessions
            .login(&req.name)
            .await
            .map_err(|e| to_status("Login", e))?;

        Ok(Response::new(pair.into()))
    }

    async fn refresh(
        &self,
        request: Request<RefreshRequest>,
    ) -> std::result::Result<Response<CreateUserResponse>, Status> {
        let req = request.into_inner();
        let pair = self
            .sessions
            .refresh(&req.refresh_token)
            .await
            .map_err(|e| to_status("Refresh", e))?;

        Ok(Response::new(pair.into()))
    }
}
