//! Cross-crate integration flows.

pub mod history_pipeline;
pub mod lifecycle;

use chrono::{DateTime, Duration, Utc};
use tv_voting_engine::PollDraft;

/// Public two-option draft open for `[start, start + length]`.
pub fn draft_between(start: DateTime<Utc>, length: Duration, min_votes: i64) -> PollDraft {
    PollDraft {
        title: "Team lunch".into(),
        description: "Where do we eat on Friday?".into(),
        creator: "0xOrganizer".into(),
        is_private: false,
        options: vec!["Pizza".into(), "Sushi".into()],
        start_time: start,
        end_time: start + length,
        min_votes,
    }
}
