//! Configuration loading and representation.
//!
//! Everything comes from environment variables. Unset variables fall back to
//! local-development defaults; the SMTP defaults are placeholders and mail
//! delivery will fail until they are overridden.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./sql_app.db";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CACHE_PREFIX: &str = "marketstat-cache";

const DEFAULT_SMTP_SERVER: &str = "smtp.example.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_USERNAME: &str = "user@example.com";
const DEFAULT_SMTP_PASSWORD: &str = "password";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Outbound mail relay settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub bind_addr: SocketAddr,
    pub cache_prefix: String,
    pub smtp: SmtpConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_raw = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let port = match lookup("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "SMTP_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let smtp = SmtpConfig {
            server: get("SMTP_SERVER", DEFAULT_SMTP_SERVER),
            port,
            username: get("SMTP_USERNAME", DEFAULT_SMTP_USERNAME),
            password: get("SMTP_PASSWORD", DEFAULT_SMTP_PASSWORD),
        };

        if smtp.server == DEFAULT_SMTP_SERVER {
            tracing::warn!("SMTP_SERVER not set; report emails will not be delivered");
        }

        Ok(Self {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            redis_url: get("REDIS_URL", DEFAULT_REDIS_URL),
            bind_addr,
            cache_prefix: get("CACHE_PREFIX", DEFAULT_CACHE_PREFIX),
            smtp,
        })
    }
}
