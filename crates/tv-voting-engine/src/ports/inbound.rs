//! Driving Ports (API - Inbound)

use crate::domain::{CastReceipt, PollDetail, PollDraft, PollSummary, UserProfile};
use crate::error::VotingResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{OptionIndex, PollId};

/// A ballot as submitted by a caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastBallot {
    pub poll_id: PollId,
    /// Raw identity; normalized by the engine
    pub voter: String,
    pub option_index: OptionIndex,
}

/// Primary Voting API
///
/// Casts on different polls never wait on each other. Casts on the same
/// poll are serialized, and a poll never counts two ballots from one identity.
#[async_trait]
pub trait VotingApi: Send + Sync {
    /// Validate and store a poll. Returns the new id.
    async fn create_poll(&self, draft: PollDraft) -> VotingResult<PollId>;

    /// Public polls plus the requestor's own private polls, oldest first.
    ///
    /// `requestor` is a raw identity; blank is treated as anonymous.
    async fn list_polls(&self, requestor: Option<&str>) -> VotingResult<Vec<PollSummary>>;

    /// Full view of a poll regardless of its privacy flag.
    async fn get_poll(&self, poll_id: PollId) -> VotingResult<PollDetail>;

    /// Count one ballot, or explain why not.
    async fn cast_vote(&self, ballot: CastBallot) -> VotingResult<CastReceipt>;
}

/// Per-identity reporting
#[async_trait]
pub trait ReportingApi: Send + Sync {
    /// Polls created or voted in by `identity`, plus its ballot history.
    async fn user_history(&self, identity: &str) -> VotingResult<UserProfile>;
}
