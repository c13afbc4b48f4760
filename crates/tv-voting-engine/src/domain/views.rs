//! Read models returned by the engine.
//!
//! Views are snapshots taken under a poll's read lock, so a view never shows
//! a tally that disagrees with its own `total_votes`.

use crate::domain::{evaluate, winning_options, Poll, PollStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{OptionIndex, PollId, VoterId};

/// One row of a poll listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSummary {
    pub id: PollId,
    pub title: String,
    pub description: String,
    pub creator: VoterId,
    pub is_private: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub min_votes: u64,
    pub option_count: usize,
    pub total_votes: u64,
    pub status: PollStatus,
    pub created_at: DateTime<Utc>,
}

impl PollSummary {
    #[must_use]
    pub fn of(poll: &Poll, now: DateTime<Utc>) -> Self {
        Self {
            id: poll.id(),
            title: poll.title().to_string(),
            description: poll.description().to_string(),
            creator: poll.creator().clone(),
            is_private: poll.is_private(),
            start_time: poll.start_time(),
            end_time: poll.end_time(),
            min_votes: poll.min_votes(),
            option_count: poll.options().len(),
            total_votes: poll.total_votes(),
            status: evaluate(poll, now),
            created_at: poll.created_at(),
        }
    }
}

/// An option with its current count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTally {
    pub index: OptionIndex,
    pub label: String,
    pub votes: u64,
}

/// Full view of one poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDetail {
    #[serde(flatten)]
    pub summary: PollSummary,
    pub options: Vec<OptionTally>,
    /// Empty unless `status` is `FINISHED`
    pub winning_options: Vec<OptionIndex>,
    pub winners: Vec<String>,
}

impl PollDetail {
    #[must_use]
    pub fn of(poll: &Poll, now: DateTime<Utc>) -> Self {
        let options = poll
            .options()
            .iter()
            .zip(poll.tally())
            .enumerate()
            .map(|(index, (label, votes))| OptionTally {
                index,
                label: label.clone(),
                votes: *votes,
            })
            .collect();
        let winning_options = winning_options(poll, now);
        let winners = winning_options
            .iter()
            .filter_map(|i| poll.option_label(*i).map(str::to_string))
            .collect();

        Self {
            summary: PollSummary::of(poll, now),
            options,
            winning_options,
            winners,
        }
    }
}

/// Confirmation of an accepted ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastReceipt {
    pub poll_id: PollId,
    pub voter: VoterId,
    pub option_index: OptionIndex,
    pub cast_at: DateTime<Utc>,
    /// Poll total right after this ballot was counted
    pub total_votes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::poll::fixtures::{poll, voter};
    use chrono::Duration;

    #[test]
    fn test_detail_lists_options_in_order() {
        let now = Utc::now();
        let mut p = poll(now);
        p.record_ballot(voter("0xa"), 1);

        let detail = PollDetail::of(&p, now);
        assert_eq!(detail.options.len(), 2);
        assert_eq!(detail.options[1].label, "Sushi");
        assert_eq!(detail.options[1].votes, 1);
        assert_eq!(detail.summary.total_votes, 1);
        assert_eq!(detail.summary.status, PollStatus::Active);
        assert!(detail.winners.is_empty());
    }

    #[test]
    fn test_detail_names_winners_after_close() {
        let now = Utc::now();
        let mut p = poll(now);
        p.record_ballot(voter("0xa"), 1);

        let detail = PollDetail::of(&p, p.end_time() + Duration::seconds(1));
        assert_eq!(detail.summary.status, PollStatus::Finished);
        assert_eq!(detail.winning_options, vec![1]);
        assert_eq!(detail.winners, vec!["Sushi".to_string()]);
    }

    #[test]
    fn test_detail_json_is_flat() {
        let now = Utc::now();
        let detail = PollDetail::of(&poll(now), now);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["title"], "Lunch");
        assert_eq!(json["status"], "ACTIVE");
        assert!(json["options"].is_array());
    }
}
