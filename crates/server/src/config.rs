//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CARTAPP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`, then `postgres://localhost:5432/cartapp`)
//! - `CARTAPP_HOST` - Bind address (default: 127.0.0.1)
//! - `CARTAPP_PORT` - Listen port (falls back to `PORT`, default: 5000)
//! - `CARTAPP_STORAGE` - `postgres` (default) or `memory`
//! - `CARTAPP_CORS_ORIGIN` - Allowed browser origin (default: any origin)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use thiserror::Error;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/cartapp";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which store implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("expected 'postgres' or 'memory', got '{other}'")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Store implementation
    pub storage: StorageBackend,
    /// Allowed CORS origin; `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: SecretString::from(DEFAULT_DATABASE_URL),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            storage: StorageBackend::default(),
            cors_origin: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("CARTAPP_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map_or(defaults.database_url, SecretString::from);

        let host = parse_or("CARTAPP_HOST", &lookup, defaults.host)?;

        let port = match lookup("CARTAPP_PORT") {
            Some(_) => parse_or("CARTAPP_PORT", &lookup, defaults.port)?,
            None => parse_or("PORT", &lookup, defaults.port)?,
        };

        let storage = match lookup("CARTAPP_STORAGE") {
            Some(raw) => raw
                .parse::<StorageBackend>()
                .map_err(|e| ConfigError::InvalidEnvVar("CARTAPP_STORAGE".to_string(), e))?,
            None => defaults.storage,
        };

        let cors_origin = lookup("CARTAPP_CORS_ORIGIN")
            .map(|raw| {
                HeaderValue::from_str(raw.trim()).map_err(|e| {
                    ConfigError::InvalidEnvVar("CARTAPP_CORS_ORIGIN".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let sentry_sample_rate =
            parse_rate("SENTRY_SAMPLE_RATE", &lookup, defaults.sentry_sample_rate)?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            &lookup,
            defaults.sentry_traces_sample_rate,
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            storage,
            cors_origin,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise return `default`.
fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a sample rate and check it lies in `0.0..=1.0`.
fn parse_rate<F>(key: &str, lookup: &F, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let rate = parse_or(key, lookup, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
