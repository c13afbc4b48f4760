//! Poll status derivation
//!
//! Status is never stored. It is a pure function of the voting window, the
//! minimum vote threshold, the current tally and the clock:
//!
//! ```text
//!            start                end
//!   ──────────┼────────────────────┼──────────────▶ now
//!   Upcoming  │      Active        │  total >= min  → Finished
//!             │  (both inclusive)  │  total <  min  → Rejected
//! ```

use crate::domain::Poll;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::OptionIndex;
use std::fmt;

/// Lifecycle position of a poll at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollStatus {
    Upcoming,
    Active,
    Finished,
    /// Closed without reaching the minimum vote count
    Rejected,
}

impl PollStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Active => "ACTIVE",
            Self::Finished => "FINISHED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether the window has closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Finished | Self::Rejected)
    }
}

impl fmt::Display for PollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status from raw parts.
#[must_use]
pub fn evaluate_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_votes: u64,
    total_votes: u64,
    now: DateTime<Utc>,
) -> PollStatus {
    if now < start {
        PollStatus::Upcoming
    } else if now <= end {
        PollStatus::Active
    } else if total_votes >= min_votes {
        PollStatus::Finished
    } else {
        PollStatus::Rejected
    }
}

/// Status of `poll` at `now`.
#[must_use]
pub fn evaluate(poll: &Poll, now: DateTime<Utc>) -> PollStatus {
    evaluate_window(
        poll.start_time(),
        poll.end_time(),
        poll.min_votes(),
        poll.total_votes(),
        now,
    )
}

/// Indices holding the maximum count. Ties return every tied index.
#[must_use]
pub fn leading_options(tally: &[u64]) -> Vec<OptionIndex> {
    let Some(max) = tally.iter().copied().max() else {
        return Vec::new();
    };
    tally
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == max)
        .map(|(index, _)| index)
        .collect()
}

/// Winning option indices; empty unless the poll is `Finished`.
#[must_use]
pub fn winning_options(poll: &Poll, now: DateTime<Utc>) -> Vec<OptionIndex> {
    match evaluate(poll, now) {
        PollStatus::Finished => leading_options(poll.tally()),
        _ => Vec::new(),
    }
}
