//! Global atomic counters for harness observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a sweep).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters — no allocations, no locking.
pub struct Metrics {
    entries_verified: AtomicU64,
    stage_failures: AtomicU64,
    bench_rounds: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            entries_verified: AtomicU64::new(0),
            stage_failures: AtomicU64::new(0),
            bench_rounds: AtomicU64::new(0),
        }
    }

    /// Increment the entries-verified counter by one.
    pub fn inc_entries_verified(&self) {
        self.entries_verified.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "entries_verified", "counter incremented");
    }

    /// Increment the stage-failures counter by one.
    pub fn inc_stage_failures(&self) {
        self.stage_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "stage_failures", "counter incremented");
    }

    /// Increment the bench-rounds counter by one.
    pub fn inc_bench_rounds(&self) {
        self.bench_rounds.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "bench_rounds", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a sweep, end of a bench run)
    /// rather than on every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            entries_verified = self.entries_verified(),
            stage_failures = self.stage_failures(),
            bench_rounds = self.bench_rounds(),
        );
    }

    /// Read the current entries-verified count.
    pub fn entries_verified(&self) -> u64 {
        self.entries_verified.load(Ordering::Relaxed)
    }

    /// Read the current stage-failures count.
    pub fn stage_failures(&self) -> u64 {
        self.stage_failures.load(Ordering::Relaxed)
    }

    /// Read the current bench-rounds count.
    pub fn bench_rounds(&self) -> u64 {
        self.bench_rounds.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.entries_verified.store(0, Ordering::Relaxed);
        self.stage_failures.store(0, Ordering::Relaxed);
        self.bench_rounds.store(0, Ordering::Relaxed);
    }
}
