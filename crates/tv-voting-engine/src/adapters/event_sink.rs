//! Event sink adapters
//!
//! Implements the `VotingEventSink` port on top of the shared event bus.

use crate::ports::outbound::VotingEventSink;
use async_trait::async_trait;
use shared_bus::{EventPublisher, VotingEvent};
use std::sync::Arc;
use tracing::{debug, warn};

/// Forwards committed facts to an [`EventPublisher`].
pub struct EventBusSink<P: EventPublisher> {
    publisher: Arc<P>,
}

impl<P: EventPublisher> EventBusSink<P> {
    pub fn new(publisher: Arc<P>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl<P: EventPublisher + 'static> VotingEventSink for EventBusSink<P> {
    async fn emit(&self, event: VotingEvent) -> usize {
        let topic = event.topic();
        let poll_id = event.poll_id();
        let receivers = self.publisher.publish(event).await;

        if receivers == 0 {
            // History pipeline not attached; the fact is lost for it
            warn!(?topic, %poll_id, "No subscribers for voting event");
        } else {
            debug!(?topic, %poll_id, receivers, "Voting event published");
        }
        receivers
    }
}

/// Records emitted events in memory. For tests.
#[derive(Default)]
pub struct RecordingSink {
    events: parking_lot::RwLock<Vec<VotingEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<VotingEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl VotingEventSink for RecordingSink {
    async fn emit(&self, event: VotingEvent) -> usize {
        self.events.write().push(event);
        1
    }
}
