//! Configuration management for Company Service
//!
//! Loading order (later wins):
//! 1. Built-in defaults
//! 2. TOML file at `$COMPANY_CONFIG` (default `config.toml`), if present
//! 3. Environment variables `COMPANY__<SECTION>__<KEY>`, e.g.
//!    `COMPANY__JWT__SECRET`, `COMPANY__SERVER__PORT`
//!
//! `routes.public_methods` may be given through the environment as a
//! comma separated list.
//!
//! # Example
//!
//! ```no_run
//! use company_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     settings.validate()?;
//!     println!("Listening on {}", settings.server.socket_addr()?);
//!     Ok(())
//! }
//! ```

use crate::error::{Result, ServiceError};
use grpc_access_gate::RoutePolicy;
use jwt_core::TokenLifetimes;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "COMPANY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";
const ENV_PREFIX: &str = "COMPANY";

/// Methods reachable without a token
pub const DEFAULT_PUBLIC_METHODS: &[&str] = &[
    "/CompanyService/Register",
    "/CompanyService/Login",
    "/grpc.health.v1.Health/Check",
    "/grpc.health.v1.Health/Watch",
];

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub jwt: JwtSettings,
    pub routes: RouteSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServiceError::Config(format!("invalid server address: {}", e)))
    }
}

#[derive(Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl JwtSettings {
    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes::new(
            Duration::from_secs(self.access_ttl_secs),
            Duration::from_secs(self.refresh_ttl_secs),
        )
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"**redacted**")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSettings {
    pub public_methods: Vec<String>,
}

impl RouteSettings {
    pub fn policy(&self) -> RoutePolicy {
        RoutePolicy::from_public_methods(self.public_methods.iter().map(|m| m.trim()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset
    pub filter: String,
    /// JSON lines when true, human readable otherwise
    pub json: bool,
}

impl Settings {
    /// Load settings using the file named by `$COMPANY_CONFIG`
    pub fn load() -> Result<Self> {
        // Load .env file for local development
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::load_from(&path)
    }

    /// Load settings from an explicit file path plus the environment
    ///
    /// A missing file is not an error; every setting except `jwt.secret`
    /// has a default.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            info!(path = %path.display(), "Loading configuration file");
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults and environment");
        }

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 50051)?
            .set_default("jwt.access_ttl_secs", 3600)? // 1 hour
            .set_default("jwt.refresh_ttl_secs", 2_592_000)? // 30 days
            .set_default("routes.public_methods", DEFAULT_PUBLIC_METHODS.to_vec())?
            .set_default("log.filter", "company_service=info,info")?
            .set_default("log.json", true)?
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("routes.public_methods"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServiceError::Config(
                "server port must be greater than 0".to_string(),
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(ServiceError::Config("server host is required".to_string()));
        }

        if self.jwt.access_ttl_secs == 0 || self.jwt.refresh_ttl_secs == 0 {
            return Err(ServiceError::Config(
                "token lifetimes must be greater than 0".to_string(),
            ));
        }

        if let Some(pos) = self
            .routes
            .public_methods
            .iter()
            .position(|m| m.trim().is_empty())
        {
            return Err(ServiceError::Config(format!(
                "routes.public_methods[{}] is empty",
                pos
            )));
        }

        Ok(())
    }
}
