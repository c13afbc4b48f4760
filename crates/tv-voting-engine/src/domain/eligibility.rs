//! Ballot eligibility
//!
//! Must run under the same write lock as [`Poll::record_ballot`] so that the
//! "has not voted yet" answer cannot go stale before the ballot is counted.

use crate::domain::{evaluate, Poll, PollStatus};
use crate::error::RejectionReason;
use chrono::{DateTime, Utc};
use shared_types::{OptionIndex, VoterId};

/// Decide whether `voter` may cast `option` on `poll` at `now`.
///
/// Checks, first failure wins:
/// 1. poll is `Active`
/// 2. option index is in range
/// 3. identity has not voted in this poll
pub fn check_eligibility(
    poll: &Poll,
    voter: &VoterId,
    option: OptionIndex,
    now: DateTime<Utc>,
) -> Result<(), RejectionReason> {
    let status = evaluate(poll, now);
    if status != PollStatus::Active {
        return Err(RejectionReason::NotActive { status });
    }

    if option >= poll.options().len() {
        return Err(RejectionReason::InvalidOption {
            index: option,
            option_count: poll.options().len(),
        });
    }

    if poll.has_voted(voter) {
        return Err(RejectionReason::AlreadyVoted);
    }

    Ok(())
}
