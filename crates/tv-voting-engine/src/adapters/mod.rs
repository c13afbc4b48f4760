//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports for a single-node deployment.

mod clock;
mod event_sink;
mod history;
mod memory_store;

pub use clock::{ManualClock, SystemClock};
pub use event_sink::{EventBusSink, RecordingSink};
pub use history::{HistoryProjector, InMemoryHistoryProjection};
pub use memory_store::InMemoryPollStore;
