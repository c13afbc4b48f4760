//! # TrustVote Node
//!
//! Wires the voting engine into a runnable service.
//!
//! ```text
//!  HTTP (axum) ──→ VotingEngine ──→ InMemoryPollStore
//!       │               │
//!       │               └──VoteCast──→ Event Bus ──→ HistoryProjector
//!       │                                                   │ (delay)
//!       └──→ ReportingService ←── InMemoryHistoryProjection ←┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize telemetry (logs + metrics)
//! 3. Attach the history projector to the bus
//! 4. Serve HTTP until Ctrl+C

pub mod api;
pub mod config;
pub mod runtime;

pub use config::{ConfigError, HistoryConfig, HttpConfig, NodeConfig};
pub use runtime::NodeRuntime;
