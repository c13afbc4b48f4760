//! # Poll Lifecycle
//!
//! Drives a poll from Upcoming to a closed outcome through the public
//! engine API, moving a manual clock across both window boundaries.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use shared_bus::VotingEvent;
    use shared_types::PollId;
    use tv_voting_engine::{
        CastBallot, InMemoryPollStore, ManualClock, PollStatus, RecordingSink, RejectionReason,
        VotingApi, VotingEngine, VotingError,
    };

    use crate::integration::draft_between;

    type Engine = VotingEngine<InMemoryPollStore, ManualClock, RecordingSink>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn setup() -> (Engine, Arc<ManualClock>, Arc<RecordingSink>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        ));
        let events = Arc::new(RecordingSink::new());
        let engine = VotingEngine::new(
            Arc::new(InMemoryPollStore::new()),
            Arc::clone(&clock),
            Arc::clone(&events),
        );
        (engine, clock, events)
    }

    async fn cast(
        engine: &Engine,
        poll_id: PollId,
        voter: &str,
        option_index: usize,
    ) -> Result<u64, VotingError> {
        engine
            .cast_vote(CastBallot {
                poll_id,
                voter: voter.into(),
                option_index,
            })
            .await
            .map(|receipt| receipt.total_votes)
    }

    // =============================================================================
    // LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_poll_walks_through_every_status() {
        let (engine, clock, events) = setup();
        let opens_at = clock_now(&clock) + Duration::hours(1);
        let poll_id = engine
            .create_poll(draft_between(opens_at, Duration::hours(2), 2))
            .await
            .unwrap();

        // Before the window
        let detail = engine.get_poll(poll_id).await.unwrap();
        assert_eq!(detail.summary.status, PollStatus::Upcoming);
        assert_eq!(
            cast(&engine, poll_id, "0xa", 0).await,
            Err(VotingError::Rejected(RejectionReason::NotActive {
                status: PollStatus::Upcoming
            }))
        );

        // Start is inclusive
        clock.set(opens_at);
        assert_eq!(cast(&engine, poll_id, "0xa", 1).await, Ok(1));
        assert_eq!(cast(&engine, poll_id, "0xb", 1).await, Ok(2));
        assert_eq!(cast(&engine, poll_id, "0xc", 0).await, Ok(3));

        // End is inclusive too
        clock.set(opens_at + Duration::hours(2));
        assert_eq!(
            engine.get_poll(poll_id).await.unwrap().summary.status,
            PollStatus::Active
        );
        assert_eq!(cast(&engine, poll_id, "0xd", 0).await, Ok(4));

        clock.advance(Duration::seconds(1));
        let detail = engine.get_poll(poll_id).await.unwrap();
        assert_eq!(detail.summary.status, PollStatus::Finished);
        assert_eq!(detail.summary.total_votes, 4);
        // 2-2 tie: both options win
        assert_eq!(detail.winning_options, vec![0, 1]);
        assert_eq!(detail.winners, vec!["Pizza".to_string(), "Sushi".to_string()]);

        assert_eq!(
            cast(&engine, poll_id, "0xe", 0).await,
            Err(VotingError::Rejected(RejectionReason::NotActive {
                status: PollStatus::Finished
            }))
        );

        let recorded = events.events();
        assert_eq!(recorded.len(), 5);
        assert!(matches!(recorded[0], VotingEvent::PollCreated { .. }));
        assert_eq!(
            recorded
                .iter()
                .filter(|e| matches!(e, VotingEvent::VoteCast { .. }))
                .count(),
            4
        );
    }

    #[tokio::test]
    async fn test_threshold_miss_rejects_without_winners() {
        let (engine, clock, _events) = setup();
        let now = clock_now(&clock);
        let poll_id = engine
            .create_poll(draft_between(now, Duration::minutes(30), 3))
            .await
            .unwrap();

        cast(&engine, poll_id, "0xa", 0).await.unwrap();
        cast(&engine, poll_id, "0xb", 0).await.unwrap();

        clock.advance(Duration::hours(1));
        let detail = engine.get_poll(poll_id).await.unwrap();
        assert_eq!(detail.summary.status, PollStatus::Rejected);
        assert!(detail.winning_options.is_empty());
        assert!(detail.winners.is_empty());
        // Tallies stay readable after rejection
        assert_eq!(detail.options[0].votes, 2);
    }

    #[tokio::test]
    async fn test_listing_keeps_creation_order_and_derives_status_per_poll() {
        let (engine, clock, _events) = setup();
        let now = clock_now(&clock);

        let mut ids = Vec::new();
        for offset in [-2i64, 0, 2] {
            let id = engine
                .create_poll(draft_between(
                    now + Duration::hours(offset),
                    Duration::minutes(90),
                    1,
                ))
                .await
                .unwrap();
            ids.push(id);
        }

        let listed = engine.list_polls(None).await.unwrap();
        let listed_ids: Vec<PollId> = listed.iter().map(|p| p.id).collect();
        assert_eq!(listed_ids, ids);

        let statuses: Vec<PollStatus> = listed.iter().map(|p| p.status).collect();
        // First poll closed with no votes against min_votes = 1
        assert_eq!(
            statuses,
            vec![PollStatus::Rejected, PollStatus::Active, PollStatus::Upcoming]
        );
    }

    fn clock_now(clock: &ManualClock) -> chrono::DateTime<Utc> {
        use tv_voting_engine::Clock;
        clock.now()
    }
}
