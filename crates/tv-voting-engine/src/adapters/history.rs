//! Ballot history pipeline
//!
//! ```text
//! Event Bus ──VoteCast──→ HistoryProjector ──(after delay)──→ InMemoryHistoryProjection
//!                          pending queue                        ↑
//!                                                 ReportingService (HistorySource)
//! ```
//!
//! The projector simulates an external indexer: every event becomes visible
//! `delay` after it was received, independently of the events around it.
//! Redelivered ballots are ignored, so at-least-once delivery is safe.

use crate::domain::HistoryEntry;
use crate::error::StoreResult;
use crate::ports::outbound::HistorySource;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{Subscription, VotingEvent};
use shared_types::VoterId;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Ballot history keyed by identity.
#[derive(Default)]
pub struct InMemoryHistoryProjection {
    entries: RwLock<HashMap<VoterId, Vec<HistoryEntry>>>,
    applied: AtomicU64,
}

impl InMemoryHistoryProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the projection.
    ///
    /// Returns `true` if a new history entry was recorded.
    pub fn apply(&self, event: &VotingEvent) -> bool {
        let VotingEvent::VoteCast {
            poll_id,
            voter,
            option_index,
            option_label,
            title,
            cast_at,
        } = event
        else {
            return false;
        };

        let mut entries = self.entries.write();
        let history = entries.entry(voter.clone()).or_default();
        if history.iter().any(|e| e.poll_id == *poll_id) {
            debug!(%poll_id, %voter, "Duplicate ballot event ignored");
            return false;
        }

        history.push(HistoryEntry {
            poll_id: *poll_id,
            title: title.clone(),
            option_index: *option_index,
            option_label: option_label.clone(),
            cast_at: *cast_at,
        });
        self.applied.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn entries_for(&self, voter: &VoterId) -> Vec<HistoryEntry> {
        self.entries.read().get(voter).cloned().unwrap_or_default()
    }

    /// Total entries recorded across all identities.
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HistorySource for InMemoryHistoryProjection {
    async fn history_for(&self, voter: &VoterId) -> StoreResult<Vec<HistoryEntry>> {
        Ok(self.entries_for(voter))
    }
}

/// Consumes bus events and applies them to a projection after a delay.
#[derive(Clone, Debug)]
pub struct HistoryProjector {
    delay: Duration,
}

impl HistoryProjector {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Run the projector on the current runtime.
    ///
    /// Stops when `shutdown` fires (or its sender is dropped), or when the
    /// bus closes and every pending event has been applied. The handle
    /// resolves to the number of entries this projector recorded.
    pub fn spawn(
        self,
        subscription: Subscription,
        projection: Arc<InMemoryHistoryProjection>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<u64> {
        tokio::spawn(self.run(subscription, projection, shutdown))
    }

    async fn run(
        self,
        mut subscription: Subscription,
        projection: Arc<InMemoryHistoryProjection>,
        mut shutdown: watch::Receiver<bool>,
    ) -> u64 {
        info!(delay_ms = self.delay.as_millis() as u64, "History projector started");

        let mut pending: VecDeque<(Instant, VotingEvent)> = VecDeque::new();
        let mut bus_open = true;
        let mut recorded = 0u64;

        while bus_open || !pending.is_empty() {
            let next_due = pending.front().map(|(due, _)| *due);

            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,

                received = subscription.recv(), if bus_open => match received {
                    Some(event) => pending.push_back((Instant::now() + self.delay, event)),
                    None => {
                        debug!(pending = pending.len(), "Event bus closed, draining");
                        bus_open = false;
                    }
                },

                _ = sleep_until(next_due.unwrap_or_else(Instant::now)), if next_due.is_some() => {
                    if let Some((_, event)) = pending.pop_front() {
                        if projection.apply(&event) {
                            recorded += 1;
                        }
                    }
                }
            }
        }

        info!(
            recorded,
            dropped = pending.len(),
            skipped = subscription.skipped(),
            "History projector stopped"
        );
        recorded
    }
}
