//! # Subscriptions
//!
//! Receiving side of the bus. A [`Subscription`] yields only events that
//! match its filter and keeps count of what it lost to lag.

use crate::events::{EventFilter, VotingEvent};
use tokio::sync::broadcast;
use tracing::warn;

/// Filtered receiver. Dropping it releases its slot on the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<VotingEvent>,
    filter: EventFilter,
    skipped: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<VotingEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            skipped: 0,
        }
    }

    /// Next matching event, or `None` once the bus is dropped.
    ///
    /// Lag is not an error: skipped events are counted and reception
    /// resumes at the oldest event still buffered.
    pub async fn recv(&mut self) -> Option<VotingEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    self.skipped += count;
                    warn!(lagged = count, "Subscriber lagged, some events dropped");
                }
            }
        }
    }

    /// Events lost to lag since the subscription was opened.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
