//! Structured observability hooks for harness run lifecycle events.
//!
//! This module provides:
//! - Run-scoped tracing spans via the `VerifySpan` RAII guard
//! - Emission functions for key lifecycle events: sweep start/finish,
//!   entry verification, benchmark rounds
//!
//! Events are emitted at `info!` level; filter with `SERBENCH_LOG`.

use tracing::info;

/// RAII guard that enters a run-scoped tracing span for one verification
/// or benchmark sweep.
pub struct VerifySpan {
    _span: tracing::span::EnteredSpan,
}

impl VerifySpan {
    /// Create and enter a span tagged with the run id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("serbench.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: verification sweep started.
pub fn emit_sweep_started(run_id: &str, entries: usize, samples: usize, workers: usize) {
    info!(
        event = "sweep.started",
        run_id = %run_id,
        entries = entries,
        samples = samples,
        workers = workers,
    );
}

/// Emit event: verification sweep finished.
pub fn emit_sweep_finished(run_id: &str, duration_ms: u64, passed: usize, failed: usize) {
    info!(
        event = "sweep.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        passed = passed,
        failed = failed,
    );
}

/// Emit event: one entry fully verified.
pub fn emit_entry_verified(run_id: &str, entry: &str, stage: &str, passed: bool) {
    info!(
        event = "entry.verified",
        run_id = %run_id,
        entry = %entry,
        stage = %stage,
        passed = passed,
    );
}

/// Emit event: timing round completed for one entry.
pub fn emit_entry_timed(run_id: &str, entry: &str, ser_nanos: u64, deser_nanos: u64, size: usize) {
    info!(
        event = "entry.timed",
        run_id = %run_id,
        entry = %entry,
        ser_nanos = ser_nanos,
        deser_nanos = deser_nanos,
        size = size,
    );
}
