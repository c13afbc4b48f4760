//! # Node Configuration
//!
//! Unified configuration for the HTTP surface, the history pipeline and
//! telemetry. Every value has a default and can be overridden from the
//! environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TV_HTTP_ADDR` | `localhost:8062` | Listen address |
//! | `TV_REQUEST_TIMEOUT_MS` | `4000` | Per-request timeout |
//! | `TV_SHUTDOWN_GRACE_MS` | `5000` | Drain budget on shutdown |
//! | `TV_HISTORY_DELAY_MS` | `2000` | History processing delay |
//! | `TV_HISTORY_CAPACITY` | `1000` | Event bus buffer per subscriber |
//!
//! Telemetry variables (`TV_ENV`, `TV_LOG_LEVEL`, ...) are read by
//! [`TelemetryConfig::from_lookup`].

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tv_telemetry::{DeployEnv, TelemetryConfig, TelemetryError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Listen address is not `host:port`.
    #[error("HTTP address '{0}' must be host:port with a non-zero port")]
    BadAddress(String),

    /// A duration or capacity that must be positive is zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// HTTP configuration.
    pub http: HttpConfig,
    /// History pipeline configuration.
    pub history: HistoryConfig,
    /// Logging and metrics configuration.
    pub telemetry: TelemetryConfig,
}

/// HTTP configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// `host:port` to bind.
    pub address: String,
    /// Requests running longer than this are answered with 408.
    pub request_timeout: Duration,
    /// How long shutdown waits for in-flight work.
    pub shutdown_grace: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "localhost:8062".to_string(),
            request_timeout: Duration::from_secs(4),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// History pipeline configuration.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Delay between a ballot and its appearance in the history projection.
    pub processing_delay: Duration,
    /// Event bus buffer per subscriber.
    pub channel_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_secs(2),
            channel_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl NodeConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            telemetry: TelemetryConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(address) = lookup("TV_HTTP_ADDR") {
            config.http.address = address.trim().to_string();
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "TV_REQUEST_TIMEOUT_MS")? {
            config.http.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "TV_SHUTDOWN_GRACE_MS")? {
            config.http.shutdown_grace = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "TV_HISTORY_DELAY_MS")? {
            config.history.processing_delay = Duration::from_millis(ms);
        }
        if let Some(capacity) = parse_var::<usize, _>(&lookup, "TV_HISTORY_CAPACITY")? {
            config.history.channel_capacity = capacity;
        }

        Ok(config)
    }

    /// Deployment environment, as selected by `TV_ENV`.
    pub fn env(&self) -> DeployEnv {
        self.telemetry.environment
    }

    /// Check values that parse but cannot work.
    ///
    /// A zero processing delay is allowed: the projection then trails the
    /// engine only by bus latency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let port = self
            .http
            .address
            .rsplit_once(':')
            .filter(|(host, _)| !host.is_empty())
            .and_then(|(_, port)| port.parse::<u16>().ok());
        if !matches!(port, Some(p) if p > 0) {
            return Err(ConfigError::BadAddress(self.http.address.clone()));
        }

        if self.http.request_timeout.is_zero() {
            return Err(ConfigError::Zero("TV_REQUEST_TIMEOUT_MS"));
        }
        if self.history.channel_capacity == 0 {
            return Err(ConfigError::Zero("TV_HISTORY_CAPACITY"));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
