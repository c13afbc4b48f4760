//! # Event Publisher
//!
//! Publishing side of the bus. Events fan out to every live subscription;
//! topic filtering happens on the receiving end.

use crate::events::{EventFilter, VotingEvent};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event, returning how many subscriptions received it.
    ///
    /// Zero receivers is not an error: the event is simply gone.
    async fn publish(&self, event: VotingEvent) -> usize;

    /// Events handed to the bus so far, delivered or not.
    fn events_published(&self) -> u64;
}

/// Single-node bus over `tokio::sync::broadcast`.
///
/// A deployment with an external history service would put a broker-backed
/// implementation behind [`EventPublisher`] instead.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<VotingEvent>,
    events_published: AtomicU64,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` events per subscription.
    ///
    /// A subscription that falls further behind skips the oldest events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Open a subscription. Only events published afterwards are seen.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: VotingEvent) -> usize {
        let topic = event.topic();
        let poll_id = event.poll_id();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(?topic, %poll_id, receivers, "Event published");
                receivers
            }
            Err(_) => {
                warn!(?topic, %poll_id, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
