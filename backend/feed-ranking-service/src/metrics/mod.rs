//! Recommendation Metrics
//!
//! Prometheus metrics for feed generation

use crate::models::{RankingStats, RecallSource};
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::time::Duration;

static FEED_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feed_ranking_requests_total",
        "Total feed requests (success/error/timeout)",
        &["status"]
    )
    .expect("Failed to register feed requests metric")
});

static GENERATION_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "feed_ranking_generation_duration_seconds",
        "Duration of a full recommendation computation",
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register generation duration metric")
});

static CANDIDATES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feed_ranking_candidates_total",
        "Candidates recalled per source",
        &["source"]
    )
    .expect("Failed to register candidates metric")
});

static DIVERSITY_PENALTIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "feed_ranking_diversity_penalties_total",
        "Videos penalized by the diversity pass"
    )
    .expect("Failed to register diversity penalties metric")
});

/// Record request outcome (success/error/timeout)
pub fn record_request(status: &str) {
    FEED_REQUESTS_TOTAL.with_label_values(&[status]).inc();
}

/// Record counters and latency of one completed computation
pub fn record_generation(stats: &RankingStats, elapsed: Duration) {
    GENERATION_DURATION_SECONDS.observe(elapsed.as_secs_f64());
    CANDIDATES_TOTAL
        .with_label_values(&[RecallSource::Collaborative.as_str()])
        .inc_by(stats.collaborative_count as u64);
    CANDIDATES_TOTAL
        .with_label_values(&[RecallSource::Content.as_str()])
        .inc_by(stats.content_count as u64);
    DIVERSITY_PENALTIES_TOTAL.inc_by(stats.penalized_count as u64);
}

/// Render the default registry in Prometheus text format
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
