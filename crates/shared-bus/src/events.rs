//! # Voting Events
//!
//! Facts published by the voting engine after a mutation has committed.
//! Nothing on the bus is a command; consumers can only observe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{OptionIndex, PollId, VoterId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingEvent {
    // =========================================================================
    // POLL LIFECYCLE
    // =========================================================================
    /// A new poll was stored.
    PollCreated {
        poll_id: PollId,
        creator: VoterId,
        title: String,
        is_private: bool,
        created_at: DateTime<Utc>,
    },

    // =========================================================================
    // BALLOTS
    // =========================================================================
    /// A ballot was accepted and counted.
    ///
    /// Carries the poll title and option label so the history pipeline can
    /// build its projection without reading back from the engine.
    VoteCast {
        poll_id: PollId,
        voter: VoterId,
        option_index: OptionIndex,
        option_label: String,
        title: String,
        cast_at: DateTime<Utc>,
    },
}

impl VotingEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::PollCreated { .. } => EventTopic::Polls,
            Self::VoteCast { .. } => EventTopic::Votes,
        }
    }

    /// The poll this event refers to.
    #[must_use]
    pub fn poll_id(&self) -> PollId {
        match self {
            Self::PollCreated { poll_id, .. } | Self::VoteCast { poll_id, .. } => *poll_id,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Poll creation events.
    Polls,
    /// Accepted ballots.
    Votes,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &VotingEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
