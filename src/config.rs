//! Configuration management for taskboard.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Primary service host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Primary service port. Defaults to `8000`.
//! - `DB_PATH` - Optional. SQLite database path. Defaults to `tasks.db`.
//! - `MAX_SUBMISSIONS` - Optional. Per-task submission quota. Defaults to `3`.
//! - `NOTIFY_URL` - Optional. Notification endpoint. Defaults to `http://127.0.0.1:8001/notify`.
//! - `NOTIFY_TIMEOUT_SECS` - Optional. Outbound notification timeout. Defaults to `5`.
//! - `NOTIFY_HOST` / `NOTIFY_PORT` - Optional. Notification receiver bind address.
//! - `GATEWAY_HOST` / `GATEWAY_PORT` - Optional. Gateway bind address.
//! - `UPSTREAM_URL` - Optional. Gateway upstream base URL. Defaults to `http://127.0.0.1:8000`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Notification configuration (outbound client + receiver service).
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Endpoint the primary service posts submission notifications to
    pub url: String,

    /// Timeout for the single outbound notification attempt
    pub timeout: Duration,

    /// Receiver service bind host
    pub host: String,

    /// Receiver service bind port
    pub port: u16,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8001/notify".to_string(),
            timeout: Duration::from_secs(5),
            host: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway bind host
    pub host: String,

    /// Gateway bind port
    pub port: u16,

    /// Base URL of the primary service the gateway proxies to
    pub upstream_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            upstream_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary service host
    pub host: String,

    /// Primary service port
    pub port: u16,

    /// SQLite database path
    pub db_path: PathBuf,

    /// Maximum submissions admitted per task
    pub max_submissions: usize,

    /// Notification configuration
    pub notify: NotifyConfig,

    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let db_path = std::env::var("DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tasks.db"));

        let max_submissions = std::env::var("MAX_SUBMISSIONS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_SUBMISSIONS".to_string(), format!("{}", e))
            })?;

        let notify_timeout_secs: u64 = std::env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("NOTIFY_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        let notify = NotifyConfig {
            url: std::env::var("NOTIFY_URL").unwrap_or_else(|_| NotifyConfig::default().url),
            timeout: Duration::from_secs(notify_timeout_secs),
            host: std::env::var("NOTIFY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("NOTIFY_PORT")
                .unwrap_or_else(|_| "8001".to_string())
                .parse()
                .map_err(|e| {
                    ConfigError::InvalidValue("NOTIFY_PORT".to_string(), format!("{}", e))
                })?,
        };

        let gateway = GatewayConfig {
            host: std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("GATEWAY_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| {
                    ConfigError::InvalidValue("GATEWAY_PORT".to_string(), format!("{}", e))
                })?,
            upstream_url: std::env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| GatewayConfig::default().upstream_url),
        };

        Ok(Self {
            host,
            port,
            db_path,
            max_submissions,
            notify,
            gateway,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(db_path: PathBuf, max_submissions: usize) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            db_path,
            max_submissions,
            notify: NotifyConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}
