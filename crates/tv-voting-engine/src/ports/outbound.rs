//! Driven Ports (SPI - Outbound Dependencies)

use crate::domain::{HistoryEntry, Poll};
use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_bus::VotingEvent;
use shared_types::{PollId, VoterId};

/// Poll persistence.
///
/// Access goes through closures so that an implementation decides how a
/// poll is locked. The contract:
///
/// - `update` holds exclusive access to that one poll for the duration of
///   `f`; no reader or writer of the same poll observes a partial result.
/// - Operations on different polls must not serialize behind each other.
/// - `scan` visits polls in insertion order, each under a consistent view.
pub trait PollStore: Send + Sync {
    /// Store a new poll.
    fn insert(&self, poll: Poll) -> StoreResult<()>;

    /// Run `f` against a consistent view of one poll. `Ok(None)` if unknown.
    fn read<R>(&self, poll_id: &PollId, f: impl FnOnce(&Poll) -> R) -> StoreResult<Option<R>>;

    /// Run `f` with exclusive access to one poll. `Ok(None)` if unknown.
    fn update<R>(&self, poll_id: &PollId, f: impl FnOnce(&mut Poll) -> R)
        -> StoreResult<Option<R>>;

    /// Visit every poll in insertion order, keeping the `Some` results.
    fn scan<R>(&self, f: impl FnMut(&Poll) -> Option<R>) -> StoreResult<Vec<R>>;

    /// Number of stored polls.
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Outlet for committed facts.
///
/// Called after the mutation is visible and outside any poll lock.
/// Publishing is fire-and-forget: it cannot fail the operation.
#[async_trait]
pub trait VotingEventSink: Send + Sync {
    /// Returns how many consumers received the event.
    async fn emit(&self, event: VotingEvent) -> usize;
}

/// Read side of the ballot history projection.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Ballots recorded for `voter`, in cast order.
    async fn history_for(&self, voter: &VoterId) -> StoreResult<Vec<HistoryEntry>>;
}
