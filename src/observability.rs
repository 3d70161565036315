//! Tracing setup and lightweight process metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Initializes the fmt subscriber, honouring `RUST_LOG` and defaulting to
/// `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters for fetch and navigation outcomes.
#[derive(Debug, Default)]
pub struct Metrics {
    days_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    cache_hits: AtomicU64,
    steps_resolved: AtomicU64,
    steps_blocked: AtomicU64,
    steps_exhausted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day_fetched(&self) {
        self.days_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn step_resolved(&self) {
        self.steps_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn step_blocked(&self) {
        self.steps_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn step_exhausted(&self) {
        self.steps_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            days_fetched: self.days_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            steps_resolved: self.steps_resolved.load(Ordering::Relaxed),
            steps_blocked: self.steps_blocked.load(Ordering::Relaxed),
            steps_exhausted: self.steps_exhausted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub days_fetched: u64,
    pub fetch_failures: u64,
    pub cache_hits: u64,
    pub steps_resolved: u64,
    pub steps_blocked: u64,
    pub steps_exhausted: u64,
}
