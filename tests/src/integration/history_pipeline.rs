//! # History Pipeline
//!
//! Tests that a ballot committed by the engine reaches the user history
//! only through the event bus, after the processing delay.
//!
//! ## Flow Tested:
//!
//! 1. **Engine → Bus**: `VoteCast` published after the ballot commits
//! 2. **Bus → Projector**: held for the processing delay, then applied
//! 3. **Projection → Reporting**: chosen option appears in the profile
//!
//! Counts in the profile come from the poll store and are exact at once;
//! only the per-poll choice and the history list trail behind.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{Duration as ChronoDuration, Utc};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use tokio::sync::watch;
    use tv_node::{NodeConfig, NodeRuntime};
    use tv_voting_engine::{
        CastBallot, EventBusSink, HistoryProjector, InMemoryHistoryProjection,
        InMemoryPollStore, ReportingApi, ReportingService, SystemClock, VotingApi, VotingEngine,
    };

    use crate::integration::draft_between;

    type Engine = VotingEngine<InMemoryPollStore, SystemClock, EventBusSink<InMemoryEventBus>>;
    type Reporting = ReportingService<InMemoryPollStore, InMemoryHistoryProjection, SystemClock>;

    struct Pipeline {
        engine: Engine,
        reporting: Reporting,
        projection: Arc<InMemoryHistoryProjection>,
        shutdown: watch::Sender<bool>,
        projector: tokio::task::JoinHandle<u64>,
    }

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn pipeline(delay: Duration) -> Pipeline {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = Arc::new(InMemoryPollStore::new());
        let clock = Arc::new(SystemClock);
        let projection = Arc::new(InMemoryHistoryProjection::new());
        let (shutdown, shutdown_rx) = watch::channel(false);

        let projector = HistoryProjector::new(delay).spawn(
            bus.subscribe(EventFilter::topics(vec![EventTopic::Votes])),
            Arc::clone(&projection),
            shutdown_rx,
        );

        Pipeline {
            engine: VotingEngine::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                Arc::new(EventBusSink::new(bus)),
            ),
            reporting: ReportingService::new(store, Arc::clone(&projection), clock),
            projection,
            shutdown,
            projector,
        }
    }

    fn ballot(poll_id: shared_types::PollId, voter: &str, option_index: usize) -> CastBallot {
        CastBallot {
            poll_id,
            voter: voter.into(),
            option_index,
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: ENGINE → BUS → PROJECTOR → REPORTING
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_choice_appears_only_after_delay() {
        let p = pipeline(Duration::from_secs(2));
        let poll_id = p
            .engine
            .create_poll(draft_between(
                Utc::now() - ChronoDuration::minutes(5),
                ChronoDuration::hours(1),
                1,
            ))
            .await
            .unwrap();
        p.engine.cast_vote(ballot(poll_id, "0xVoter", 1)).await.unwrap();

        // Counts are exact before the projection catches up
        let profile = p.reporting.user_history("0xvoter").await.unwrap();
        assert_eq!(profile.participated_count, 1);
        assert_eq!(profile.created_count, 0);
        assert!(profile.polls[0].voted);
        assert_eq!(profile.polls[0].chosen_option, None);
        assert!(profile.history.is_empty());
        assert!(profile.history_available);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(p.projection.applied(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let profile = p.reporting.user_history("0xVOTER").await.unwrap();
        assert_eq!(profile.polls[0].chosen_option, Some(1));
        assert_eq!(profile.history.len(), 1);
        assert_eq!(profile.history[0].option_label, "Sushi");
        assert_eq!(profile.history[0].title, "Team lunch");

        p.shutdown.send(true).unwrap();
        assert_eq!(p.projector.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_does_not_accumulate_across_a_burst() {
        let p = pipeline(Duration::from_secs(2));
        let poll_id = p
            .engine
            .create_poll(draft_between(
                Utc::now() - ChronoDuration::minutes(5),
                ChronoDuration::hours(1),
                1,
            ))
            .await
            .unwrap();

        for i in 0..20 {
            p.engine
                .cast_vote(ballot(poll_id, &format!("0x{i:02x}"), i % 2))
                .await
                .unwrap();
        }

        // Twenty ballots at once all land one delay later, not twenty delays later
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(p.projection.applied(), 20);

        p.shutdown.send(true).unwrap();
        assert_eq!(p.projector.await.unwrap(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_creator_profile_needs_no_projection() {
        let p = pipeline(Duration::from_secs(2));
        let start = Utc::now() - ChronoDuration::minutes(5);
        for _ in 0..3 {
            p.engine
                .create_poll(draft_between(start, ChronoDuration::hours(1), 1))
                .await
                .unwrap();
        }

        let profile = p.reporting.user_history("0xorganizer").await.unwrap();
        assert_eq!(profile.created_count, 3);
        assert_eq!(profile.participated_count, 0);
        assert!(profile.polls.iter().all(|e| e.created_by_user && !e.voted));

        p.shutdown.send(true).unwrap();
        assert_eq!(p.projector.await.unwrap(), 0);
    }

    // =============================================================================
    // INTEGRATION TESTS: NODE WIRING
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_node_runtime_projects_ballots() {
        let mut config = NodeConfig::default();
        config.history.processing_delay = Duration::from_millis(500);
        let node = NodeRuntime::new(config);
        node.start();

        let engine = node.engine();
        let poll_id = engine
            .create_poll(draft_between(
                Utc::now() - ChronoDuration::minutes(5),
                ChronoDuration::hours(1),
                1,
            ))
            .await
            .unwrap();
        engine.cast_vote(ballot(poll_id, "0xabc", 0)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(600)).await;
        let profile = node.reporting().user_history("0xabc").await.unwrap();
        assert_eq!(profile.polls[0].chosen_option, Some(0));
        assert_eq!(node.projection().applied(), 1);

        node.shutdown().await;
    }
}
