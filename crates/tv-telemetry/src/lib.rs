//! # TrustVote Telemetry
//!
//! Logging and metrics bootstrap for the voting node.
//!
//! ## Components
//!
//! - **Logs**: `tracing` + `tracing-subscriber`, pretty for local runs and
//!   JSON lines everywhere else
//! - **Metrics**: Prometheus counters and histograms in a private registry,
//!   exposed as text by the node's `/metrics` route
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tv_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env()?;
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TV_ENV` | `local` | `local`, `dev` or `prod` |
//! | `TV_SERVICE_NAME` | `trustvote` | Service name in logs |
//! | `TV_LOG_LEVEL` / `RUST_LOG` | per env | Log filter |
//! | `TV_JSON_LOGS` | per env | JSON output toggle |
//! | `TV_CONSOLE_OUTPUT` | `true` | Console output toggle |

mod config;
mod logging;
pub mod metrics;

pub use config::{DeployEnv, TelemetryConfig};
pub use metrics::{
    encode_metrics, register_metrics, CAST_DURATION, POLLS_CREATED, VOTES_ACCEPTED,
    VOTES_REJECTED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize metrics and the global log subscriber.
///
/// Call once, early in `main`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Metrics first so counters exist before the first request is logged
    register_metrics()?;
    logging::init_logging(config)
}
