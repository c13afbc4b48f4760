//! Voting Service - Core business logic
//!
//! ```text
//! cast_vote ──parse identity──→ store.update(poll_id) ┐
//!                                 │ write lock (this poll only)
//!                                 │   clock.now()
//!                                 │   check_eligibility  ── Err → nothing written
//!                                 │   record_ballot
//!                                 └───────────────────────┘
//!                               metrics, log, emit VoteCast (lock released)
//! ```

use crate::domain::{check_eligibility, CastReceipt, Poll, PollDetail, PollDraft, PollSummary};
use crate::error::{RejectionReason, VotingError, VotingResult};
use crate::ports::inbound::{CastBallot, VotingApi};
use crate::ports::outbound::{Clock, PollStore, VotingEventSink};
use async_trait::async_trait;
use shared_bus::VotingEvent;
use shared_types::{PollId, VoterId};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tv_telemetry::{time_histogram, CAST_DURATION, POLLS_CREATED, VOTES_ACCEPTED, VOTES_REJECTED};

/// Receipt and event of an accepted ballot, or why it was refused.
type BallotOutcome = Result<(CastReceipt, VotingEvent), RejectionReason>;

/// The voting engine.
///
/// Holds no lock of its own: all mutual exclusion is per poll, inside the
/// store. Cheap to share behind an `Arc`.
pub struct VotingEngine<S, C, E>
where
    S: PollStore,
    C: Clock,
    E: VotingEventSink,
{
    store: Arc<S>,
    clock: Arc<C>,
    events: Arc<E>,
}

impl<S, C, E> VotingEngine<S, C, E>
where
    S: PollStore,
    C: Clock,
    E: VotingEventSink,
{
    pub fn new(store: Arc<S>, clock: Arc<C>, events: Arc<E>) -> Self {
        Self {
            store,
            clock,
            events,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Eligibility check and tally mutation under one poll write lock.
    ///
    /// Outer `None`: unknown poll.
    fn commit_ballot(
        &self,
        poll_id: PollId,
        voter: VoterId,
        option: usize,
    ) -> VotingResult<Option<BallotOutcome>> {
        let _timer = time_histogram!(CAST_DURATION);
        let outcome = self.store.update(&poll_id, |poll: &mut Poll| -> BallotOutcome {
            let now = self.clock.now();
            check_eligibility(poll, &voter, option, now)?;

            let option_label = poll.option_label(option).unwrap_or_default().to_string();
            poll.record_ballot(voter.clone(), option);

            let receipt = CastReceipt {
                poll_id,
                voter: voter.clone(),
                option_index: option,
                cast_at: now,
                total_votes: poll.total_votes(),
            };
            let event = VotingEvent::VoteCast {
                poll_id,
                voter,
                option_index: option,
                option_label,
                title: poll.title().to_string(),
                cast_at: now,
            };
            Ok((receipt, event))
        })?;
        Ok(outcome)
    }
}

#[async_trait]
impl<S, C, E> VotingApi for VotingEngine<S, C, E>
where
    S: PollStore + 'static,
    C: Clock + 'static,
    E: VotingEventSink + 'static,
{
    async fn create_poll(&self, draft: PollDraft) -> VotingResult<PollId> {
        let valid = draft.validate().map_err(|e| {
            debug!(error = %e, "Poll draft rejected");
            VotingError::from(e)
        })?;

        let poll = Poll::create(PollId::new(), valid, self.clock.now());
        let poll_id = poll.id();
        let creator = poll.creator().clone();
        let is_private = poll.is_private();
        let event = VotingEvent::PollCreated {
            poll_id,
            creator: creator.clone(),
            title: poll.title().to_string(),
            is_private,
            created_at: poll.created_at(),
        };

        self.store.insert(poll).map_err(|e| {
            warn!(%poll_id, error = %e, "Failed to store poll");
            VotingError::from(e)
        })?;
        POLLS_CREATED.inc();

        info!(%poll_id, %creator, is_private, "Poll created");
        self.events.emit(event).await;

        Ok(poll_id)
    }

    async fn list_polls(&self, requestor: Option<&str>) -> VotingResult<Vec<PollSummary>> {
        // Blank or missing requestor lists public polls only
        let requestor = requestor.and_then(|raw| VoterId::parse(raw).ok());
        let now = self.clock.now();

        let summaries = self.store.scan(|poll| {
            poll.is_visible_to(requestor.as_ref())
                .then(|| PollSummary::of(poll, now))
        })?;

        debug!(count = summaries.len(), requestor = ?requestor, "Listed polls");
        Ok(summaries)
    }

    async fn get_poll(&self, poll_id: PollId) -> VotingResult<PollDetail> {
        let now = self.clock.now();
        self.store
            .read(&poll_id, |poll| PollDetail::of(poll, now))?
            .ok_or(VotingError::NotFound { poll_id })
    }

    async fn cast_vote(&self, ballot: CastBallot) -> VotingResult<CastReceipt> {
        let CastBallot {
            poll_id,
            voter,
            option_index,
        } = ballot;
        let voter = VoterId::parse(&voter)?;

        let Some(outcome) = self.commit_ballot(poll_id, voter.clone(), option_index)? else {
            debug!(%poll_id, %voter, "Ballot for unknown poll");
            return Err(VotingError::NotFound { poll_id });
        };

        match outcome {
            Ok((receipt, event)) => {
                VOTES_ACCEPTED.inc();
                info!(
                    %poll_id,
                    %voter,
                    option_index,
                    total_votes = receipt.total_votes,
                    "Ballot accepted"
                );
                self.events.emit(event).await;
                Ok(receipt)
            }
            Err(reason) => {
                VOTES_REJECTED.with_label_values(&[reason.code()]).inc();
                info!(%poll_id, %voter, option_index, reason = reason.code(), "Ballot rejected");
                Err(reason.into())
            }
        }
    }
}
