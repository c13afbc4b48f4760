//! Error types for the voting engine
//!
//! Every error carries a stable machine-readable code (see [`VotingError::code`])
//! that the HTTP adapter maps onto a status code.

use crate::domain::PollStatus;
use chrono::{DateTime, Utc};
use shared_types::{IdentityError, OptionIndex, PollId};
use thiserror::Error;

/// Malformed poll definition or request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Poll title must not be blank")]
    EmptyTitle,

    #[error("Identity must not be blank")]
    EmptyIdentity,

    #[error("Malformed poll id: {0}")]
    MalformedPollId(String),

    #[error("A poll needs between 2 and 4 options, got {got}")]
    OptionCount { got: usize },

    #[error("Option {index} has a blank label")]
    EmptyOption { index: usize },

    /// End must be strictly after start
    #[error("Voting window is empty: start {start} is not before end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Minimum vote count must be positive, got {got}")]
    NonPositiveMinVotes { got: i64 },
}

impl From<IdentityError> for ValidationError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Empty => Self::EmptyIdentity,
            IdentityError::MalformedPollId(raw) => Self::MalformedPollId(raw),
        }
    }
}

/// Why a well-formed ballot was refused.
///
/// Checked in declaration order: a ballot on a closed poll is `NotActive`
/// even if its option index is also out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("Poll is not accepting votes (status: {status})")]
    NotActive { status: PollStatus },

    #[error("Option {index} does not exist (poll has {option_count} options)")]
    InvalidOption {
        index: OptionIndex,
        option_count: usize,
    },

    #[error("Identity has already voted in this poll")]
    AlreadyVoted,
}

impl RejectionReason {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotActive { .. } => "NOT_ACTIVE",
            Self::InvalidOption { .. } => "INVALID_OPTION",
            Self::AlreadyVoted => "ALREADY_VOTED",
        }
    }
}

/// Poll store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing store cannot serve the request right now
    #[error("Poll store unavailable: {reason}")]
    Unavailable { reason: String },

    /// A poll with this id already exists
    #[error("Poll {poll_id} already stored")]
    Duplicate { poll_id: PollId },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Voting engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Poll not found: {poll_id}")]
    NotFound { poll_id: PollId },

    #[error("Ballot rejected: {0}")]
    Rejected(#[from] RejectionReason),

    #[error("Storage error: {reason}")]
    StoreUnavailable { reason: String },
}

impl VotingError {
    /// Stable error code for API consumers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Rejected(reason) => reason.code(),
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
        }
    }
}

impl From<StoreError> for VotingError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable {
            reason: err.to_string(),
        }
    }
}

impl From<IdentityError> for VotingError {
    fn from(err: IdentityError) -> Self {
        Self::Validation(err.into())
    }
}

/// Result type for voting operations
pub type VotingResult<T> = Result<T, VotingError>;
