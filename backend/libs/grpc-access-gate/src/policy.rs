//! Declarative route policy
//!
//! Maps fully qualified gRPC method paths (`/Service/Method`) to an access
//! level. Matching is exact; anything not listed is protected.

use std::collections::HashMap;

/// Access level of a single method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAccess {
    /// Reachable without a credential
    Public,
    /// Requires a verified token
    Protected,
}

/// Method path -> access level table handed to the gate at construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    routes: HashMap<String, RouteAccess>,
}

impl RoutePolicy {
    /// Empty policy: every method is protected
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a policy where exactly the given methods are public
    pub fn from_public_methods<I, M>(methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        methods
            .into_iter()
            .fold(Self::new(), |policy, method| policy.public(method))
    }

    pub fn public(mut self, method: impl Into<String>) -> Self {
        self.insert(method, RouteAccess::Public);
        self
    }

    pub fn protected(mut self, method: impl Into<String>) -> Self {
        self.insert(method, RouteAccess::Protected);
        self
    }

    pub fn insert(&mut self, method: impl Into<String>, access: RouteAccess) {
        self.routes.insert(method.into(), access);
    }

    pub fn access_for(&self, method: &str) -> RouteAccess {
        self.routes
            .get(method)
            .copied()
            .unwrap_or(RouteAccess::Protected)
    }

    pub fn is_public(&self, method: &str) -> bool {
        self.access_for(method) == RouteAccess::Public
    }

    /// Public method paths, sorted
    pub fn public_methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self
            .routes
            .iter()
            .filter(|(_, access)| **access == RouteAccess::Public)
            .map(|(method, _)| method.as_str())
            .collect();
        methods.sort_unstable();
        methods
    }
}
