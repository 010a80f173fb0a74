//! Round-trip correctness verification.
//!
//! One evaluation pushes a sample value through five ordered stages —
//! forward transform, serialize, deserialize, reverse transform, compare —
//! and stops at the first failure. The result is always a
//! [`VerificationOutcome`]; neither errors nor panics from a codec escape
//! the stage boundary, so one broken adapter can never abort the batch.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::{Codec, Transformer};
use crate::entry::CodecEntry;
use crate::metrics::METRICS;
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// The five ordered pipeline stages, plus the terminal success marker.
///
/// Used for failure attribution: an outcome's stage names the step that
/// ended the evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Domain value → codec-native representation.
    Forward,

    /// Codec-native representation → bytes.
    Serialize,

    /// Bytes → codec-native representation.
    Deserialize,

    /// Codec-native representation → domain value.
    Reverse,

    /// Value equality of the round-tripped result against the original.
    Compare,

    /// All stages completed and the values matched.
    Success,
}

impl Stage {
    /// Stage name as used in reports and structured log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Forward => "forward",
            Stage::Serialize => "serialize",
            Stage::Deserialize => "deserialize",
            Stage::Reverse => "reverse",
            Stage::Compare => "compare",
            Stage::Success => "success",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of verifying one (entry, sample) pair.
///
/// Exactly one outcome is produced per pair per run; never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationOutcome {
    /// Display name of the entry under test.
    pub entry_name: String,

    /// Stage that terminated the evaluation (`Success` if none failed).
    pub stage: Stage,

    /// Whether the evaluation failed.
    pub failed: bool,

    /// Diagnostic detail for failures: the captured error or panic message,
    /// or for `Compare` both the original and round-tripped values.
    pub detail: Option<String>,
}

impl VerificationOutcome {
    /// Construct a passing outcome.
    pub fn success(entry_name: &str) -> Self {
        Self {
            entry_name: entry_name.to_string(),
            stage: Stage::Success,
            failed: false,
            detail: None,
        }
    }

    /// Construct a failing outcome for the given stage.
    pub fn failure(entry_name: &str, stage: Stage, detail: String) -> Self {
        Self {
            entry_name: entry_name.to_string(),
            stage,
            failed: true,
            detail: Some(detail),
        }
    }

    /// Whether the full round trip succeeded.
    pub fn passed(&self) -> bool {
        !self.failed
    }
}

// ---------------------------------------------------------------------------
// The stage machine
// ---------------------------------------------------------------------------

/// Run a closure as one pipeline stage, capturing both returned errors and
/// panics as the stage's failure detail.
fn run_stage<R>(
    f: impl FnOnce() -> Result<R, String>,
) -> Result<R, String> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic with non-string payload".to_string());
            Err(format!("panicked: {msg}"))
        }
    }
}

/// Drive the five-stage round trip for a typed (codec, transformer) pair.
///
/// Each evaluation starts from the untouched original sample and shares no
/// intermediate state with any other evaluation.
pub(crate) fn run_round_trip<C, T>(
    entry_name: &str,
    transformer: &T,
    codec: &C,
    sample: &T::Domain,
) -> VerificationOutcome
where
    C: Codec,
    T: Transformer<Native = C::Native>,
    T::Domain: PartialEq + fmt::Debug,
{
    let fail = |stage: Stage, detail: String| {
        warn!(entry = %entry_name, stage = %stage, %detail, "round-trip stage failed");
        METRICS.inc_stage_failures();
        VerificationOutcome::failure(entry_name, stage, detail)
    };

    let native = match run_stage(|| transformer.forward(sample).map_err(|e| e.to_string())) {
        Ok(n) => n,
        Err(detail) => return fail(Stage::Forward, detail),
    };

    let bytes = match run_stage(|| codec.serialize(&native).map_err(|e| e.to_string())) {
        Ok(b) => b,
        Err(detail) => return fail(Stage::Serialize, detail),
    };

    let native2 = match run_stage(|| codec.deserialize(&bytes).map_err(|e| e.to_string())) {
        Ok(n) => n,
        Err(detail) => return fail(Stage::Deserialize, detail),
    };

    let output = match run_stage(|| transformer.reverse(native2).map_err(|e| e.to_string())) {
        Ok(v) => v,
        Err(detail) => return fail(Stage::Reverse, detail),
    };

    if &output != sample {
        let detail = format!("original:   {sample:?}\nround-trip: {output:?}");
        return fail(Stage::Compare, detail);
    }

    debug!(entry = %entry_name, "round trip verified");
    VerificationOutcome::success(entry_name)
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Verify one entry against one sample. Pure with respect to the table;
/// its only side effect is diagnostic output.
pub fn verify<J>(entry: &CodecEntry<J>, sample: &J) -> VerificationOutcome {
    let outcome = entry.run_verification(sample);
    METRICS.inc_entries_verified();
    outcome
}

/// Verify every table entry against every sample, sequentially.
///
/// Outcomes are ordered entry-major: all samples for the first entry, then
/// all samples for the second, matching table registration order.
pub fn verify_all<J>(registry: &Registry<J>, samples: &[J]) -> Vec<VerificationOutcome> {
    let mut outcomes = Vec::with_capacity(registry.len() * samples.len());
    for entry in registry.all_entries() {
        for sample in samples {
            outcomes.push(verify(entry, sample));
        }
    }
    outcomes
}

/// Verify every table entry against every sample across worker tasks.
///
/// The flattened (entry, sample) job list is split into contiguous chunks,
/// one blocking task per worker; each worker appends into its own slot and
/// the slots are concatenated after join, so the merged output is identical
/// to [`verify_all`] — same outcomes, same order.
pub async fn verify_parallel<J>(
    registry: Arc<Registry<J>>,
    samples: Arc<Vec<J>>,
    workers: usize,
) -> Vec<VerificationOutcome>
where
    J: Send + Sync + 'static,
{
    let total = registry.len() * samples.len();
    if total == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, total);
    let chunk = total.div_ceil(workers);

    let mut handles = Vec::with_capacity(workers);
    for w in 0..workers {
        let start = w * chunk;
        let end = ((w + 1) * chunk).min(total);
        if start >= end {
            break;
        }
        let registry = Arc::clone(&registry);
        let samples = Arc::clone(&samples);
        handles.push(tokio::task::spawn_blocking(move || {
            let per_entry = samples.len();
            let mut slot = Vec::with_capacity(end - start);
            for job in start..end {
                let entry = registry
                    .entry_at(job / per_entry)
                    .expect("job index within table bounds");
                slot.push(verify(entry, &samples[job % per_entry]));
            }
            slot
        }));
    }

    let mut outcomes = Vec::with_capacity(total);
    for handle in handles {
        let slot = handle.await.expect("verification worker panicked");
        outcomes.extend(slot);
    }
    outcomes
}
