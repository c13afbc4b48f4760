//! # tv-voting-engine
//!
//! Time-gated polls with exactly-once ballots per identity.
//!
//! ## Overview
//!
//! - **Derived status**: Upcoming / Active / Finished / Rejected is computed
//!   from the window, the threshold and the live tally on every read
//! - **Atomic casts**: eligibility check and tally mutation share one
//!   per-poll write lock
//! - **No global lock**: polls live in a sharded map, casts on different
//!   polls proceed in parallel
//! - **Facts out**: `PollCreated` / `VoteCast` are published after commit for
//!   the asynchronous history pipeline
//!
//! ## Architecture
//!
//! ```text
//!   VotingApi ──→ VotingEngine ──→ PollStore (per-poll RwLock)
//!                     │   │
//!                     │   └──→ Clock
//!                     └──emit──→ VotingEventSink ──→ Event Bus
//!                                                       │
//!                                     HistoryProjector ←┘ (delayed)
//!                                            │
//!   ReportingApi ──→ ReportingService ──→ HistorySource + PollStore
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tv_voting_engine::{VotingEngine, InMemoryPollStore, SystemClock, RecordingSink};
//! use tv_voting_engine::ports::inbound::VotingApi;
//!
//! let engine = VotingEngine::new(
//!     Arc::new(InMemoryPollStore::new()),
//!     Arc::new(SystemClock),
//!     Arc::new(RecordingSink::new()),
//! );
//! let poll_id = engine.create_poll(draft).await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod reporting;
pub mod service;

pub use adapters::{
    EventBusSink, HistoryProjector, InMemoryHistoryProjection, InMemoryPollStore, ManualClock,
    RecordingSink, SystemClock,
};
pub use domain::{
    CastReceipt, HistoryEntry, OptionTally, Poll, PollDetail, PollDraft, PollStatus, PollSummary,
    UserPollEntry, UserProfile,
};
pub use error::{RejectionReason, StoreError, ValidationError, VotingError, VotingResult};
pub use ports::{
    CastBallot, Clock, HistorySource, PollStore, ReportingApi, VotingApi, VotingEventSink,
};
pub use reporting::ReportingService;
pub use service::VotingEngine;
