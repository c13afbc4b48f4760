//! Per-identity participation records.

use crate::domain::PollSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{OptionIndex, PollId, VoterId};

/// One accepted ballot as seen by the history projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub poll_id: PollId,
    pub title: String,
    pub option_index: OptionIndex,
    pub option_label: String,
    pub cast_at: DateTime<Utc>,
}

/// A poll the identity created or voted in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPollEntry {
    pub summary: PollSummary,
    pub created_by_user: bool,
    pub voted: bool,
    /// Known once the history projection has caught up
    pub chosen_option: Option<OptionIndex>,
}

/// Everything known about one identity.
///
/// `created_count` and `participated_count` come from the poll store and are
/// exact. `history` and `chosen_option` come from the asynchronous history
/// projection and may trail recent ballots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub identity: VoterId,
    pub created_count: usize,
    pub participated_count: usize,
    pub polls: Vec<UserPollEntry>,
    pub history: Vec<HistoryEntry>,
    /// False when the history projection could not be read
    pub history_available: bool,
}
