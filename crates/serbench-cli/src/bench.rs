//! Timing loops for correctness-passing entries.
//!
//! Timing mechanics follow the classic harness recipe: warm up until a time
//! budget is spent, then run a fixed number of trials and keep the best
//! (least-interfered) trial. "Serialize" timing includes the forward
//! transform and "deserialize" timing includes the reverse transform, so the
//! numbers reflect what a caller of each codec actually pays.

use std::io::Write;
use std::time::{Duration, Instant};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::debug;

use serbench_core::{metrics::METRICS, CodecEntry, MediaContent, StageFailure};

/// Knobs for the timing loops.
#[derive(Debug, Clone, Copy)]
pub struct BenchConfig {
    /// Operations per trial.
    pub iterations: u32,

    /// Trials per entry; the best trial wins.
    pub trials: u32,

    /// Warm-up budget per entry before the first trial.
    pub warmup: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 2_000,
            trials: 5,
            warmup: Duration::from_millis(250),
        }
    }
}

/// Best-trial timing and size figures for one entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryTiming {
    /// Serialized payload size in bytes.
    pub size_bytes: usize,

    /// zlib-compressed payload size in bytes — a rough measure of the
    /// format's redundancy.
    pub compressed_bytes: usize,

    /// Nanoseconds per serialize operation (forward + serialize).
    pub ser_nanos: u64,

    /// Nanoseconds per deserialize operation (deserialize + reverse).
    pub deser_nanos: u64,
}

/// zlib-compressed length of a payload.
fn compressed_len(bytes: &[u8]) -> usize {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing to a Vec cannot fail.
    encoder.write_all(bytes).expect("write to Vec");
    encoder.finish().expect("finish to Vec").len()
}

/// Time one entry against the sample.
///
/// Callers are expected to have verified the entry first; a stage failure
/// mid-timing still surfaces as an error rather than a panic.
pub fn time_entry(
    entry: &CodecEntry<MediaContent>,
    sample: &MediaContent,
    config: &BenchConfig,
) -> Result<EntryTiming, StageFailure> {
    let bytes = entry.serialize_once(sample)?;
    let size_bytes = bytes.len();
    let compressed_bytes = compressed_len(&bytes);

    // Warm-up: alternate both directions until the budget is spent.
    let warmup_start = Instant::now();
    while warmup_start.elapsed() < config.warmup {
        let b = entry.serialize_once(sample)?;
        entry.deserialize_once(&b)?;
    }

    let mut best_ser = Duration::MAX;
    let mut best_deser = Duration::MAX;
    for trial in 0..config.trials {
        let start = Instant::now();
        for _ in 0..config.iterations {
            std::hint::black_box(entry.serialize_once(sample)?);
        }
        best_ser = best_ser.min(start.elapsed());

        let start = Instant::now();
        for _ in 0..config.iterations {
            std::hint::black_box(entry.deserialize_once(&bytes)?);
        }
        best_deser = best_deser.min(start.elapsed());

        debug!(entry = %entry.name(), trial = trial, "trial complete");
    }
    METRICS.inc_bench_rounds();

    let per_op = |total: Duration| (total.as_nanos() / u128::from(config.iterations.max(1))) as u64;
    Ok(EntryTiming {
        size_bytes,
        compressed_bytes,
        ser_nanos: per_op(best_ser),
        deser_nanos: per_op(best_deser),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serbench_codecs::JsonCodec;
    use serbench_core::Direct;

    fn fast_config() -> BenchConfig {
        BenchConfig {
            iterations: 10,
            trials: 2,
            warmup: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_time_entry_produces_plausible_figures() {
        let entry = CodecEntry::new(JsonCodec::new(), Direct::new());
        let sample = MediaContent::standard_sample();
        let timing = time_entry(&entry, &sample, &fast_config()).expect("timing");

        assert!(timing.size_bytes > 0);
        assert!(
            timing.compressed_bytes < timing.size_bytes,
            "JSON should compress: {timing:?}"
        );
        assert!(timing.ser_nanos > 0);
        assert!(timing.deser_nanos > 0);
    }

    #[test]
    fn test_compressed_len_shrinks_redundant_input() {
        let input = vec![b'a'; 4096];
        assert!(compressed_len(&input) < input.len());
    }
}
