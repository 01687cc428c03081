//! # Bootstrap Metrics
//!
//! Metrics for the startup bootstrap: attempts, outcomes by reason, store
//! fetch latency and the number of published configuration entries.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{HistogramVec, IntCounter, IntCounterVec, IntGauge};
use std::sync::LazyLock;

static BOOTSTRAP_ATTEMPTS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_bootstrap_attempts_total",
        "Total number of bootstrap runs started",
    )
    .expect("Failed to create BOOTSTRAP_ATTEMPTS_TOTAL metric - this should never happen")
});

static BOOTSTRAP_SUCCESS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_bootstrap_success_total",
        "Total number of bootstrap runs that published configuration",
    )
    .expect("Failed to create BOOTSTRAP_SUCCESS_TOTAL metric - this should never happen")
});

static BOOTSTRAP_FAILURES_TOTAL_BY_REASON: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_bootstrap_failures_total_by_reason",
            "Total number of failed bootstrap runs by failure reason",
        ),
        &["reason"],
    )
    .expect(
        "Failed to create BOOTSTRAP_FAILURES_TOTAL_BY_REASON metric - this should never happen",
    )
});

static SECRET_FETCH_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secret_bootstrap_fetch_duration_seconds",
            "Duration of secret store fetches in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["backend"],
    )
    .expect("Failed to create SECRET_FETCH_DURATION metric - this should never happen")
});

static PUBLISHED_ENTRIES: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "secret_bootstrap_published_entries",
        "Number of configuration entries published by the bootstrap",
    )
    .expect("Failed to create PUBLISHED_ENTRIES metric - this should never happen")
});

/// Register bootstrap metrics with the registry
pub(crate) fn register_bootstrap_metrics() -> Result<()> {
    REGISTRY.register(Box::new(BOOTSTRAP_ATTEMPTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BOOTSTRAP_SUCCESS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(BOOTSTRAP_FAILURES_TOTAL_BY_REASON.clone()))?;
    REGISTRY.register(Box::new(SECRET_FETCH_DURATION.clone()))?;
    REGISTRY.register(Box::new(PUBLISHED_ENTRIES.clone()))?;
    Ok(())
}

pub fn increment_bootstrap_attempts() {
    BOOTSTRAP_ATTEMPTS_TOTAL.inc();
}

pub fn increment_bootstrap_success() {
    BOOTSTRAP_SUCCESS_TOTAL.inc();
}

pub fn increment_bootstrap_failures(reason: &str) {
    BOOTSTRAP_FAILURES_TOTAL_BY_REASON
        .with_label_values(&[reason])
        .inc();
}

pub fn observe_fetch_duration(backend: &str, duration: f64) {
    SECRET_FETCH_DURATION
        .with_label_values(&[backend])
        .observe(duration);
}

pub fn set_published_entries(count: usize) {
    PUBLISHED_ENTRIES.set(i64::try_from(count).unwrap_or(i64::MAX));
}
