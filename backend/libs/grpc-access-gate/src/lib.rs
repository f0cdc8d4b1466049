//! gRPC Access Gate
//!
//! Per-call authorization for tonic servers. Every inbound call is checked
//! against a route policy: public methods pass untouched, everything else
//! must carry a token in the `authorization` metadata that verifies under
//! the shared [`jwt_core::TokenEngine`].
//!
//! ## Architecture
//!
//! ```text
//! Client                               Server
//! ┌──────────────────────┐             ┌─────────────────────────┐
//! │ CredentialInterceptor│             │ AccessGateLayer         │
//! │ authorization: <jwt> │ ──────────> │ 1. policy lookup        │
//! └──────────────────────┘             │ 2. verify token         │
//!                                      │ 3. Claims -> extensions │
//!                                      └───────────┬─────────────┘
//!                                                  │
//!                                                  ▼
//!                                      ┌─────────────────────────┐
//!                                      │ Handler                 │
//!                                      │ request.claims()?       │
//!                                      └─────────────────────────┘
//! ```
//!
//! ## Denials
//!
//! Both outcomes are `PERMISSION_DENIED` with a fixed message:
//!
//! | Situation | Message |
//! |---|---|
//! | no `authorization` entry | `user isn't authorized` |
//! | token invalid or expired | `no permission to access this call` |
//!
//! Which verification check failed is logged server-side only.

mod client;
mod extensions;
mod gate;
mod layer;
mod policy;

pub use client::CredentialInterceptor;
pub use extensions::ClaimsExt;
pub use gate::{
    AccessGate, GateDecision, GateError, AUTHORIZATION_METADATA_KEY, PERMISSION_DENIED_MESSAGE,
    UNAUTHORIZED_MESSAGE,
};
pub use layer::{AccessGateLayer, AccessGateService};
pub use policy::{RouteAccess, RoutePolicy};

// Re-export for convenience
pub use jwt_core::{Claims, Principal};
