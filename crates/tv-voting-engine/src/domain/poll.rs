//! Poll entity and draft validation
//!
//! A [`Poll`] is created once from a validated [`PollDraft`]. Afterwards only
//! the tally and the voter set change, and only through [`Poll::record_ballot`].

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{OptionIndex, PollId, VoterId};
use std::collections::HashSet;

/// Fewest options a poll may offer.
pub const MIN_OPTIONS: usize = 2;

/// Most options a poll may offer.
pub const MAX_OPTIONS: usize = 4;

/// Unvalidated poll definition, as received from a caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw creator identity; normalized during validation
    pub creator: String,
    #[serde(default)]
    pub is_private: bool,
    pub options: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub min_votes: i64,
}

impl PollDraft {
    /// Check the draft and normalize its fields.
    ///
    /// Checks run in a fixed order and the first failure wins: title,
    /// creator, option count, option labels, window, minimum votes.
    pub fn validate(self) -> Result<ValidPoll, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let creator = VoterId::parse(&self.creator)?;

        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options.len()) {
            return Err(ValidationError::OptionCount {
                got: self.options.len(),
            });
        }

        let mut options = Vec::with_capacity(self.options.len());
        for (index, label) in self.options.iter().enumerate() {
            let label = label.trim();
            if label.is_empty() {
                return Err(ValidationError::EmptyOption { index });
            }
            options.push(label.to_string());
        }

        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }

        let min_votes = u64::try_from(self.min_votes)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ValidationError::NonPositiveMinVotes {
                got: self.min_votes,
            })?;

        Ok(ValidPoll {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            creator,
            is_private: self.is_private,
            options,
            start_time: self.start_time,
            end_time: self.end_time,
            min_votes,
        })
    }
}

/// A draft that passed validation. Only obtainable via [`PollDraft::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidPoll {
    title: String,
    description: String,
    creator: VoterId,
    is_private: bool,
    options: Vec<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    min_votes: u64,
}

/// A stored poll: fixed definition plus a live tally.
#[derive(Clone, Debug)]
pub struct Poll {
    id: PollId,
    title: String,
    description: String,
    creator: VoterId,
    is_private: bool,
    options: Vec<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    min_votes: u64,
    created_at: DateTime<Utc>,
    /// Counted ballots per option, same length as `options`
    tally: Vec<u64>,
    voters: HashSet<VoterId>,
}

impl Poll {
    /// Materialize a validated draft with an empty tally.
    #[must_use]
    pub fn create(id: PollId, valid: ValidPoll, created_at: DateTime<Utc>) -> Self {
        let tally = vec![0; valid.options.len()];
        Self {
            id,
            title: valid.title,
            description: valid.description,
            creator: valid.creator,
            is_private: valid.is_private,
            options: valid.options,
            start_time: valid.start_time,
            end_time: valid.end_time,
            min_votes: valid.min_votes,
            created_at,
            tally,
            voters: HashSet::new(),
        }
    }

    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn creator(&self) -> &VoterId {
        &self.creator
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn option_label(&self, index: OptionIndex) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn min_votes(&self) -> u64 {
        self.min_votes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tally(&self) -> &[u64] {
        &self.tally
    }

    /// Sum of the tally. Always equal to the number of distinct voters.
    pub fn total_votes(&self) -> u64 {
        self.tally.iter().sum()
    }

    pub fn has_voted(&self, voter: &VoterId) -> bool {
        self.voters.contains(voter)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Visible to `requestor` in listings: public, or private and owned.
    pub fn is_visible_to(&self, requestor: Option<&VoterId>) -> bool {
        !self.is_private || requestor == Some(&self.creator)
    }

    /// Count one ballot. The caller must have run the eligibility check
    /// under the same write lock.
    pub(crate) fn record_ballot(&mut self, voter: VoterId, option: OptionIndex) {
        let inserted = self.voters.insert(voter);
        debug_assert!(inserted, "ballot recorded twice for one identity");
        self.tally[option] += 1;
        debug_assert_eq!(self.total_votes(), self.voters.len() as u64);
    }
}
