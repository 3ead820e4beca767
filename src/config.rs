//! Server configuration
//!
//! Settings come from `PLACES_*` environment variables layered over
//! defaults. `RUST_LOG` is read separately by the tracing subscriber.

use std::env;
use std::time::Duration;

use axum::http::HeaderValue;

/// Origins of the development frontend
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("unknown log format '{0}', expected 'pretty' or 'json'")]
    UnknownLogFormat(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Runtime configuration for the HTTP server and status broadcaster
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Period between status broadcasts
    pub status_interval: Duration,
    /// Outbound queue length per status connection
    pub status_buffer: usize,
    pub cors_origins: Vec<HeaderValue>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            status_interval: Duration::from_secs(1),
            status_buffer: 16,
            cors_origins: DEFAULT_CORS_ORIGINS
                .iter()
                .copied()
                .map(HeaderValue::from_static)
                .collect(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup (defaults for unset variables)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("PLACES_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PLACES_PORT") {
            config.port = parse_number("PLACES_PORT", &port)?;
        }
        if let Some(ms) = lookup("PLACES_STATUS_INTERVAL_MS") {
            let ms: u64 = parse_positive("PLACES_STATUS_INTERVAL_MS", &ms)?;
            config.status_interval = Duration::from_millis(ms);
        }
        if let Some(buffer) = lookup("PLACES_STATUS_BUFFER") {
            config.status_buffer = parse_positive("PLACES_STATUS_BUFFER", &buffer)?;
        }
        if let Some(origins) = lookup("PLACES_CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins)?;
        }
        if let Some(format) = lookup("PLACES_LOG_FORMAT") {
            config.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::UnknownLogFormat(format)),
            };
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let parsed: T = parse_number(var, value)?;
    if parsed == T::default() {
        return Err(ConfigError::Zero { var });
    }
    Ok(parsed)
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            // credentials are allowed, which rules out a wildcard origin
            if origin == "*" {
                return Err(ConfigError::InvalidOrigin(origin.to_string()));
            }
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}
