//! Per-call authorization decision
//!
//! The gate looks at the method path and the `authorization` metadata of an
//! inbound call and decides whether it may reach its handler.

use crate::policy::{RouteAccess, RoutePolicy};
use chrono::{DateTime, Utc};
use http::HeaderMap;
use jwt_core::{Claims, TokenEngine};
use std::sync::Arc;
use thiserror::Error;
use tonic::Status;
use tracing::{debug, info, warn};

/// Metadata key carrying the raw token (no scheme prefix)
pub const AUTHORIZATION_METADATA_KEY: &str = "authorization";

/// Denial message when no credential is present
pub const UNAUTHORIZED_MESSAGE: &str = "user isn't authorized";

/// Denial message when the credential fails verification
pub const PERMISSION_DENIED_MESSAGE: &str = "no permission to access this call";

/// Outcome of an allowed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Method is on the public allow-list; no credential was inspected
    Public,
    /// Credential verified; claims are forwarded to the handler
    Authenticated(Claims),
}

impl GateDecision {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Public => None,
            Self::Authenticated(claims) => Some(claims),
        }
    }
}

/// Reason a call was denied
///
/// Both variants surface as `PermissionDenied` on the wire and differ only
/// in their message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthorized,

    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    PermissionDenied,
}

impl From<GateError> for Status {
    fn from(err: GateError) -> Self {
        Status::permission_denied(err.to_string())
    }
}

/// Route policy plus token engine, shared by every connection
#[derive(Debug, Clone)]
pub struct AccessGate {
    engine: Arc<TokenEngine>,
    policy: Arc<RoutePolicy>,
}

impl AccessGate {
    pub fn new(engine: Arc<TokenEngine>, policy: RoutePolicy) -> Self {
        Self {
            engine,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    pub fn engine(&self) -> &TokenEngine {
        &self.engine
    }

    /// Decide whether a call to `method` may proceed
    ///
    /// ## Errors
    ///
    /// - `GateError::Unauthorized`: protected method, no `authorization` entry
    /// - `GateError::PermissionDenied`: the first `authorization` entry is
    ///   not valid ASCII, is invalid, or is expired
    pub fn authorize(&self, method: &str, headers: &HeaderMap) -> Result<GateDecision, GateError> {
        self.authorize_at(method, headers, Utc::now())
    }

    /// Same as [`authorize`](Self::authorize) with an explicit clock
    pub fn authorize_at(
        &self,
        method: &str,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<GateDecision, GateError> {
        info!(method, "Incoming call");

        if self.policy.access_for(method) == RouteAccess::Public {
            debug!(method, "Public method, skipping credential check");
            return Ok(GateDecision::Public);
        }

        // Only the first entry counts when the key is repeated
        let value = headers.get(AUTHORIZATION_METADATA_KEY).ok_or_else(|| {
            warn!(method, "Missing authorization metadata");
            GateError::Unauthorized
        })?;

        let token = value.to_str().map_err(|_| {
            warn!(method, "Authorization metadata is not valid ASCII");
            GateError::PermissionDenied
        })?;

        let claims = self.engine.verify_at(token, now).map_err(|e| {
            warn!(method, error = %e, "Token verification failed");
            GateError::PermissionDenied
        })?;

        debug!(method, principal = %claims.sub, "Call authorized");
        Ok(GateDecision::Authenticated(claims))
    }
}
