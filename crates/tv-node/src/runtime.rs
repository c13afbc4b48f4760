//! Node wiring: event bus, engine, history pipeline and HTTP server.

use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tv_voting_engine::{
    EventBusSink, HistoryProjector, InMemoryHistoryProjection, InMemoryPollStore,
    ReportingService, SystemClock, VotingEngine,
};

use crate::api::{self, AppState};
use crate::config::NodeConfig;

/// Engine as wired in the node.
pub type NodeEngine = VotingEngine<InMemoryPollStore, SystemClock, EventBusSink<InMemoryEventBus>>;

/// Reporting service as wired in the node.
pub type NodeReporting =
    ReportingService<InMemoryPollStore, InMemoryHistoryProjection, SystemClock>;

/// The voting node.
pub struct NodeRuntime {
    config: NodeConfig,
    bus: Arc<InMemoryEventBus>,
    engine: Arc<NodeEngine>,
    reporting: Arc<NodeReporting>,
    projection: Arc<InMemoryHistoryProjection>,
    projector: Mutex<Option<JoinHandle<u64>>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Create the node. Nothing runs until [`Self::start`].
    pub fn new(config: NodeConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::with_capacity(
            config.history.channel_capacity,
        ));
        let store = Arc::new(InMemoryPollStore::new());
        let clock = Arc::new(SystemClock);
        let projection = Arc::new(InMemoryHistoryProjection::new());

        let engine = Arc::new(VotingEngine::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Arc::new(EventBusSink::new(Arc::clone(&bus))),
        ));
        let reporting = Arc::new(ReportingService::new(
            store,
            Arc::clone(&projection),
            clock,
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            bus,
            engine,
            reporting,
            projection,
            projector: Mutex::new(None),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Attach the history projector to the bus.
    ///
    /// Must run before the first request so no ballot is published without
    /// a subscriber.
    pub fn start(&self) {
        let mut slot = self.projector.lock();
        if slot.is_some() {
            warn!("History projector already running");
            return;
        }

        let subscription = self
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::Votes]));
        let handle = HistoryProjector::new(self.config.history.processing_delay).spawn(
            subscription,
            Arc::clone(&self.projection),
            self.shutdown_rx.clone(),
        );
        *slot = Some(handle);
        info!(
            delay_ms = self.config.history.processing_delay.as_millis() as u64,
            "History pipeline attached"
        );
    }

    /// Handler state for the HTTP router.
    pub fn app_state(&self) -> AppState {
        AppState {
            voting: Arc::clone(&self.engine) as _,
            reporting: Arc::clone(&self.reporting) as _,
        }
    }

    /// Serve HTTP until [`Self::shutdown`] is called.
    pub async fn serve(&self) -> Result<()> {
        let address = &self.config.http.address;
        let listener = tokio::net::TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        info!(addr = %address, "HTTP server listening");

        let router = api::router(self.app_state(), self.config.http.request_timeout);
        let mut shutdown = self.shutdown_rx.clone();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                // Sender dropped counts as shutdown too
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await
            .context("HTTP server failed")
    }

    /// Signal shutdown and wait for the history projector to stop.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let handle = self.projector.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(self.config.http.shutdown_grace, handle).await {
                Ok(Ok(recorded)) => info!(recorded, "History projector stopped"),
                Ok(Err(e)) => error!(error = %e, "History projector panicked"),
                Err(_) => warn!("History projector did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    pub fn engine(&self) -> Arc<NodeEngine> {
        Arc::clone(&self.engine)
    }

    pub fn reporting(&self) -> Arc<NodeReporting> {
        Arc::clone(&self.reporting)
    }

    pub fn projection(&self) -> Arc<InMemoryHistoryProjection> {
        Arc::clone(&self.projection)
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tv_voting_engine::{CastBallot, PollDraft, ReportingApi, VotingApi};

    fn fast_config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.history.processing_delay = Duration::from_millis(50);
        config
    }

    fn open_draft() -> PollDraft {
        let now = chrono::Utc::now();
        PollDraft {
            title: "Lunch".into(),
            description: String::new(),
            creator: "0xowner".into(),
            is_private: false,
            options: vec!["Pizza".into(), "Sushi".into()],
            start_time: now - chrono::Duration::hours(1),
            end_time: now + chrono::Duration::hours(1),
            min_votes: 1,
        }
    }

    #[tokio::test]
    async fn test_history_converges_after_delay() {
        let node = NodeRuntime::new(fast_config());
        node.start();

        let engine = node.engine();
        let poll_id = engine.create_poll(open_draft()).await.unwrap();
        engine
            .cast_vote(CastBallot {
                poll_id,
                voter: "0xVoter".into(),
                option_index: 1,
            })
            .await
            .unwrap();

        // Counts are exact immediately
        let profile = node.reporting().user_history("0xvoter").await.unwrap();
        assert_eq!(profile.participated_count, 1);

        // Caller-side polling until the projection catches up
        let mut chosen = None;
        for _ in 0..50 {
            let profile = node.reporting().user_history("0xvoter").await.unwrap();
            chosen = profile.polls[0].chosen_option;
            if chosen.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(chosen, Some(1));

        node.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_shutdown_stops_projector() {
        let node = NodeRuntime::new(fast_config());
        node.start();
        node.start();
        node.shutdown().await;
        assert!(node.projector.lock().is_none());
    }
}
