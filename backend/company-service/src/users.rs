//! User directory
//!
//! Registered users are identified by name only. The directory is the
//! persistence seam: `InMemoryUserDirectory` backs the service today.

use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

/// Longest accepted username, in characters
pub const MAX_USERNAME_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create a user
    ///
    /// ## Errors
    ///
    /// - `ServiceError::InvalidUsername` for blank or over-long names
    /// - `ServiceError::UserAlreadyExists` if the name is taken
    async fn create_user(&self, name: &str) -> Result<User>;

    /// Look a user up by exact name
    ///
    /// ## Errors
    ///
    /// Returns `ServiceError::UserNotFound` if no such user exists.
    async fn find_user(&self, name: &str) -> Result<User>;
}

fn validate_username(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidUsername(
            "username must not be empty".to_string(),
        ));
    }

    if name.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ServiceError::InvalidUsername(format!(
            "username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<String, User>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create_user(&self, name: &str) -> Result<User> {
        validate_username(name)?;

        match self.users.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ServiceError::UserAlreadyExists),
            Entry::Vacant(slot) => {
                let user = User {
                    name: name.to_string(),
                };
                slot.insert(user.clone());
                debug!(username = %name, "User created");
                Ok(user)
            }
        }
    }

    async fn find_user(&self, name: &str) -> Result<User> {
        self.users
            .get(name)
            .map(|user| user.value().clone())
            .ok_or(ServiceError::UserNotFound)
    }
}
