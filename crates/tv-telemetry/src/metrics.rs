//! Prometheus metrics for the voting node.
//!
//! All metrics follow the naming convention: `tv_<area>_<metric>_<unit>`
//!
//! - **Counter**: polls created, ballots accepted, ballots rejected by reason
//! - **Histogram**: time spent inside the per-poll critical section of a cast

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // POLL METRICS
    // =========================================================================

    /// Total polls created
    pub static ref POLLS_CREATED: Counter = Counter::new(
        "tv_polls_created_total",
        "Total number of polls created"
    ).expect("metric creation failed");

    // =========================================================================
    // BALLOT METRICS
    // =========================================================================

    /// Total ballots accepted
    pub static ref VOTES_ACCEPTED: Counter = Counter::new(
        "tv_votes_accepted_total",
        "Total number of ballots accepted and counted"
    ).expect("metric creation failed");

    /// Ballots rejected, labelled by stable rejection code
    pub static ref VOTES_REJECTED: CounterVec = CounterVec::new(
        Opts::new("tv_votes_rejected_total", "Ballots rejected by business rule"),
        &["reason"]  // reason: NOT_ACTIVE / INVALID_OPTION / ALREADY_VOTED
    ).expect("metric creation failed");

    /// Cast critical section duration
    pub static ref CAST_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "tv_cast_duration_seconds",
            "Time spent holding a poll lock while casting"
        ).buckets(exponential_buckets(0.000_001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

static REGISTERED: OnceLock<Result<(), TelemetryError>> = OnceLock::new();

/// Register all metrics with the global registry.
///
/// Only the first call registers; later calls return its outcome, failure
/// included.
pub fn register_metrics() -> Result<(), TelemetryError> {
    register_once(&REGISTERED, &REGISTRY)
}

fn register_once(
    outcome: &OnceLock<Result<(), TelemetryError>>,
    registry: &Registry,
) -> Result<(), TelemetryError> {
    outcome.get_or_init(|| register_into(registry)).clone()
}

fn register_into(registry: &Registry) -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(POLLS_CREATED.clone()),
        Box::new(VOTES_ACCEPTED.clone()),
        Box::new(VOTES_REJECTED.clone()),
        Box::new(CAST_DURATION.clone()),
    ];

    for metric in metrics {
        registry
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
