//! # Ballot Benchmarks
//!
//! | Scenario | What it measures |
//! |----------|------------------|
//! | single cast | Validation, eligibility and commit for one ballot |
//! | distinct polls | Parallel casts that never share a poll lock |
//! | shared poll | Parallel casts serialized on one poll lock |
//! | listing | Scan cost as the number of polls grows |

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::PollId;
use tokio::runtime::Runtime;
use tv_voting_engine::{
    CastBallot, InMemoryPollStore, PollDraft, RecordingSink, SystemClock, VotingApi, VotingEngine,
};

type Engine = VotingEngine<InMemoryPollStore, SystemClock, RecordingSink>;

fn engine() -> Arc<Engine> {
    Arc::new(VotingEngine::new(
        Arc::new(InMemoryPollStore::new()),
        Arc::new(SystemClock),
        Arc::new(RecordingSink::new()),
    ))
}

fn open_draft() -> PollDraft {
    let now = Utc::now();
    PollDraft {
        title: "Benchmark".into(),
        description: String::new(),
        creator: "0xbench".into(),
        is_private: false,
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        start_time: now - ChronoDuration::hours(1),
        end_time: now + ChronoDuration::hours(24),
        min_votes: 1,
    }
}

fn create_polls(rt: &Runtime, engine: &Engine, count: usize) -> Vec<PollId> {
    rt.block_on(async {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            ids.push(engine.create_poll(open_draft()).await.expect("create poll"));
        }
        ids
    })
}

// ============================================================================
// SINGLE CAST
// ============================================================================

fn bench_single_cast(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let engine = engine();
    let poll_id = create_polls(&rt, &engine, 1)[0];
    let mut rng = rand::thread_rng();

    c.bench_function("cast_single", |b| {
        b.iter(|| {
            // Fresh identity each time so every ballot is accepted
            let voter = format!("0x{:032x}", rng.gen::<u128>());
            let receipt = rt.block_on(engine.cast_vote(CastBallot {
                poll_id,
                voter,
                option_index: rng.gen_range(0..4),
            }));
            black_box(receipt.is_ok())
        })
    });
}

// ============================================================================
// CONTENTION: DISTINCT VS SHARED POLLS
// ============================================================================

fn bench_parallel_casts(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("runtime");

    let mut group = c.benchmark_group("cast_parallel");
    group.measurement_time(Duration::from_secs(10));

    for tasks in [4usize, 16, 64] {
        group.throughput(Throughput::Elements(tasks as u64));

        group.bench_with_input(BenchmarkId::new("distinct_polls", tasks), &tasks, |b, &n| {
            b.iter_batched(
                || {
                    let engine = engine();
                    let ids = create_polls(&rt, &engine, n);
                    (engine, ids)
                },
                |(engine, ids)| rt.block_on(cast_all(engine, ids)),
                criterion::BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("shared_poll", tasks), &tasks, |b, &n| {
            b.iter_batched(
                || {
                    let engine = engine();
                    let id = create_polls(&rt, &engine, 1)[0];
                    (engine, vec![id; n])
                },
                |(engine, ids)| rt.block_on(cast_all(engine, ids)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// One ballot per entry of `targets`, each from its own identity.
async fn cast_all(engine: Arc<Engine>, targets: Vec<PollId>) -> usize {
    let handles: Vec<_> = targets
        .into_iter()
        .enumerate()
        .map(|(i, poll_id)| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .cast_vote(CastBallot {
                        poll_id,
                        voter: format!("0xvoter{i}"),
                        option_index: i % 4,
                    })
                    .await
                    .is_ok()
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap_or(false) {
            accepted += 1;
        }
    }
    black_box(accepted)
}

// ============================================================================
// LISTING
// ============================================================================

fn bench_listing(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let mut group = c.benchmark_group("list_polls");

    for polls in [10usize, 100, 1_000] {
        let engine = engine();
        create_polls(&rt, &engine, polls);

        group.throughput(Throughput::Elements(polls as u64));
        group.bench_with_input(BenchmarkId::from_parameter(polls), &polls, |b, _| {
            b.iter(|| black_box(rt.block_on(engine.list_polls(None)).map(|l| l.len())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_cast, bench_parallel_casts, bench_listing);
criterion_main!(benches);
