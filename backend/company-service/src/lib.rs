//! Company Service
//!
//! gRPC service whose calls are guarded by the access gate. Register and
//! Login are public and hand out token pairs; everything else requires a
//! valid token in the `authorization` metadata.

pub mod config;
pub mod error;
pub mod grpc;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod users;

pub use error::{Result, ServiceError};
