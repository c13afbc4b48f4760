//! # Shared Bus - Event Bus for Voting Facts
//!
//! The voting engine publishes the facts it commits (a poll was created, a
//! ballot was accepted). Consumers such as the history pipeline subscribe
//! and build their own projections at their own pace.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────────┐
//! │ Voting Engine│                    │ History Pipeline │
//! │              │    publish()       │                  │
//! │              │ ──────┐            │                  │
//! └──────────────┘       │            └──────────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Delivery is best-effort: an event published while nobody listens is
//! dropped, and a subscriber that falls more than the channel capacity
//! behind skips the oldest events.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, VotingEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::Subscription;

/// Maximum events to buffer per subscriber before the oldest are skipped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
