//! Register / Login / Refresh
//!
//! Each call ends in a fresh access/refresh token pair for the user.

use crate::error::Result;
use crate::users::UserDirectory;
use chrono::{DateTime, Utc};
use jwt_core::{Principal, TokenEngine, TokenPair};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserDirectory>,
    engine: Arc<TokenEngine>,
}

impl SessionService {
    pub fn new(users: Arc<dyn UserDirectory>, engine: Arc<TokenEngine>) -> Self {
        Self { users, engine }
    }

    /// Create the user and sign them in
    pub async fn register(&self, name: &str) -> Result<TokenPair> {
        let user = self.users.create_user(name).await?;
        let pair = self.engine.issue_pair(&Principal::new(user.name.as_str()))?;

        info!(username = %user.name, "User registered");
        Ok(pair)
    }

    /// Sign in an existing user
    pub async fn login(&self, name: &str) -> Result<TokenPair> {
        let user = self.users.find_user(name).await?;
        let pair = self.engine.issue_pair(&Principal::new(user.name.as_str()))?;

        info!(username = %user.name, "User logged in");
        Ok(pair)
    }

    /// Exchange a refresh token for a new pair
    ///
    /// The principal must still exist in the directory.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        self.refresh_at(refresh_token, Utc::now()).await
    }

    /// `refresh` against a fixed clock; the token is verified once
    pub async fn refresh_at(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<TokenPair> {
        let claims = self.engine.verify_refresh_at(refresh_token, now)?;
        self.users.find_user(claims.principal().as_str()).await?;
        let pair = self.engine.issue_pair_at(claims.principal(), now)?;

        info!(username = %claims.sub, "Tokens refreshed");
        Ok(pair)
    }
}
