//! Back-office configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOURNIL_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `FOURNIL_HOST` - Bind address (default: 127.0.0.1)
//! - `FOURNIL_PORT` - Listen port (default: 3001)
//! - `FOURNIL_EXCLUDED_ORDER_STATUSES` - Comma-separated order statuses left
//!   out of the production summary (default: `cancelled,delivered`)
//! - `FOURNIL_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use fournil_core::OrderStatus;

const DEFAULT_EXCLUDED_STATUSES: &str = "cancelled,delivered";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Back-office application configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Order statuses the production summary never loads
    pub excluded_order_statuses: Vec<OrderStatus>,
    /// Emit logs as JSON
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("excluded_order_statuses", &self.excluded_order_statuses)
            .field("log_json", &self.log_json)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("FOURNIL_DATABASE_URL")?;
        let host = get_env_or_default("FOURNIL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOURNIL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FOURNIL_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FOURNIL_PORT".to_string(), e.to_string()))?;
        let excluded_order_statuses = parse_order_statuses(&get_env_or_default(
            "FOURNIL_EXCLUDED_ORDER_STATUSES",
            DEFAULT_EXCLUDED_STATUSES,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("FOURNIL_EXCLUDED_ORDER_STATUSES".to_string(), e))?;
        let log_json = get_optional_env("FOURNIL_LOG_JSON").is_some_and(|v| is_truthy(&v));
        let sentry_dsn = get_optional_env("SENTRY_DSN").filter(|dsn| !dsn.is_empty());
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            excluded_order_statuses,
            log_json,
            sentry_dsn,
            sentry_environment,
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

/// Parse a comma-separated list of order statuses.
///
/// Blank entries are skipped; duplicates are kept once.
///
/// # Errors
///
/// Returns the offending entry if it is not a known status.
pub fn parse_order_statuses(raw: &str) -> Result<Vec<OrderStatus>, String> {
    let mut statuses = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let status: OrderStatus = entry.parse()?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
