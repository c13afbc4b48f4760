//! Per-identity reporting
//!
//! Joins two sources with different consistency:
//!
//! | Field | Source | Consistency |
//! |-------|--------|-------------|
//! | `created_count`, `participated_count`, `polls` | poll store | exact |
//! | `history`, `chosen_option` | history projection | eventual |
//!
//! Callers that need to see a ballot they just cast in `history` poll this
//! endpoint again; the service itself never retries or waits.

use crate::domain::{HistoryEntry, PollSummary, UserPollEntry, UserProfile};
use crate::error::VotingResult;
use crate::ports::inbound::ReportingApi;
use crate::ports::outbound::{Clock, HistorySource, PollStore};
use async_trait::async_trait;
use shared_types::VoterId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-side service behind [`ReportingApi`].
pub struct ReportingService<S, H, C>
where
    S: PollStore,
    H: HistorySource,
    C: Clock,
{
    store: Arc<S>,
    history: Arc<H>,
    clock: Arc<C>,
}

impl<S, H, C> ReportingService<S, H, C>
where
    S: PollStore,
    H: HistorySource,
    C: Clock,
{
    pub fn new(store: Arc<S>, history: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            store,
            history,
            clock,
        }
    }

    /// History is best-effort: a failing projection degrades the profile
    /// instead of failing it.
    async fn load_history(&self, voter: &VoterId) -> (Vec<HistoryEntry>, bool) {
        match self.history.history_for(voter).await {
            Ok(entries) => (entries, true),
            Err(e) => {
                warn!(%voter, error = %e, "History projection unavailable");
                (Vec::new(), false)
            }
        }
    }
}

#[async_trait]
impl<S, H, C> ReportingApi for ReportingService<S, H, C>
where
    S: PollStore + 'static,
    H: HistorySource + 'static,
    C: Clock + 'static,
{
    async fn user_history(&self, identity: &str) -> VotingResult<UserProfile> {
        let voter = VoterId::parse(identity)?;
        let (history, history_available) = self.load_history(&voter).await;
        let now = self.clock.now();

        let polls: Vec<UserPollEntry> = self.store.scan(|poll| {
            let created_by_user = poll.creator() == &voter;
            let voted = poll.has_voted(&voter);
            (created_by_user || voted).then(|| UserPollEntry {
                summary: PollSummary::of(poll, now),
                created_by_user,
                voted,
                chosen_option: None,
            })
        })?;

        let polls: Vec<UserPollEntry> = polls
            .into_iter()
            .map(|mut entry| {
                if entry.voted {
                    entry.chosen_option = history
                        .iter()
                        .find(|h| h.poll_id == entry.summary.id)
                        .map(|h| h.option_index);
                }
                entry
            })
            .collect();

        let created_count = polls.iter().filter(|p| p.created_by_user).count();
        let participated_count = polls.iter().filter(|p| p.voted).count();

        debug!(
            %voter,
            created_count,
            participated_count,
            history_len = history.len(),
            "Built user profile"
        );

        Ok(UserProfile {
            identity: voter,
            created_count,
            participated_count,
            polls,
            history,
            history_available,
        })
    }
}
