//! Telemetry configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::TelemetryError;

/// Deployment environment. Selects the default log format and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployEnv {
    /// Developer machine: human-readable output, debug level.
    Local,
    /// Shared development cluster: JSON output, debug level.
    Dev,
    /// Production: JSON output, info level.
    Prod,
}

impl DeployEnv {
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Local | Self::Dev => "debug",
            Self::Prod => "info",
        }
    }

    #[must_use]
    pub fn default_json_logs(&self) -> bool {
        !matches!(self, Self::Local)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl FromStr for DeployEnv {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(TelemetryError::Config(format!(
                "unknown environment '{other}' (expected local, dev or prod)"
            ))),
        }
    }
}

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Deployment environment
    pub environment: DeployEnv,

    /// Log level filter (trace, debug, info, warn, error) or full EnvFilter directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::for_environment(DeployEnv::Local)
    }
}

impl TelemetryConfig {
    /// Defaults for a given environment.
    #[must_use]
    pub fn for_environment(environment: DeployEnv) -> Self {
        Self {
            service_name: "trustvote".to_string(),
            environment,
            log_level: environment.default_log_level().to_string(),
            console_output: true,
            json_logs: environment.default_json_logs(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TV_ENV`: local, dev or prod (default: local)
    /// - `TV_SERVICE_NAME`: Service name (default: trustvote)
    /// - `TV_LOG_LEVEL` or `RUST_LOG`: Log filter (default depends on `TV_ENV`)
    /// - `TV_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `TV_JSON_LOGS`: Enable JSON logs (default: false for local, true otherwise)
    pub fn from_env() -> Result<Self, TelemetryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TelemetryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("TV_ENV") {
            Some(raw) => raw.parse()?,
            None => DeployEnv::Local,
        };
        let mut config = Self::for_environment(environment);

        if let Some(name) = lookup("TV_SERVICE_NAME") {
            config.service_name = name;
        }
        if let Some(level) = lookup("TV_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            config.log_level = level;
        }
        if let Some(v) = lookup("TV_CONSOLE_OUTPUT") {
            config.console_output = v.to_lowercase() != "false" && v != "0";
        }
        if let Some(v) = lookup("TV_JSON_LOGS") {
            config.json_logs = v.to_lowercase() == "true" || v == "1";
        }

        Ok(config)
    }
}
