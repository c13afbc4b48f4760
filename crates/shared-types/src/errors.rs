//! # Error Types
//!
//! Parse errors for the shared identifier types.

use thiserror::Error;

/// Errors produced while parsing identifiers supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Identity string was empty after trimming.
    #[error("identity must not be empty")]
    Empty,

    /// Poll id was not a valid UUID.
    #[error("malformed poll id: {0}")]
    MalformedPollId(String),
}
