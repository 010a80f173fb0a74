//! Report artifacts for the benchmark driver.
//!
//! Two output artifacts per run:
//! - `verify_results.json` — machine-readable per-entry verification outcomes
//! - `bench_results.json` + Markdown summary table — timing/size rows for
//!   entries that proved correctness

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use serbench_core::{MediaContent, VerificationOutcome};

use crate::bench::EntryTiming;

/// SHA256 hex digest of the sample's canonical JSON encoding; pins a report
/// to the exact ground-truth value it was produced against.
pub fn sample_digest(sample: &MediaContent) -> Result<String> {
    let bytes = serde_json::to_vec(sample).context("encode sample for digest")?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// ── verify_results.json schema ────────────────────────────────────────────

/// Aggregate verification results for one sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyResultsArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub sample_digest: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<VerificationOutcome>,
}

impl VerifyResultsArtifact {
    pub fn new(run_id: Uuid, sample_digest: String, outcomes: Vec<VerificationOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        Self {
            schema_version: "1.0".to_string(),
            generated_at: Utc::now(),
            run_id,
            sample_digest,
            total,
            passed,
            failed: total - passed,
            outcomes,
        }
    }
}

/// Write verify_results.json.
pub fn write_verify_results_json(path: &Path, artifact: &VerifyResultsArtifact) -> Result<()> {
    let json = serde_json::to_string_pretty(artifact).context("serialize verify results")?;
    std::fs::write(path, json).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

// ── bench_results.json schema ─────────────────────────────────────────────

/// One report row: either timing numbers for a verified entry, or the
/// failure that excluded it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchRow {
    pub entry: String,
    pub group: String,
    pub verified: bool,
    /// Stage name of the verification failure, for excluded entries.
    pub failure_stage: Option<String>,
    pub timing: Option<EntryTiming>,
}

/// Aggregate timing results for one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchResultsArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub sample_digest: String,
    pub iterations: u32,
    pub trials: u32,
    pub rows: Vec<BenchRow>,
}

impl BenchResultsArtifact {
    pub fn new(
        run_id: Uuid,
        sample_digest: String,
        iterations: u32,
        trials: u32,
        rows: Vec<BenchRow>,
    ) -> Self {
        Self {
            schema_version: "1.0".to_string(),
            generated_at: Utc::now(),
            run_id,
            sample_digest,
            iterations,
            trials,
            rows,
        }
    }
}

/// Write bench_results.json.
pub fn write_bench_results_json(path: &Path, artifact: &BenchResultsArtifact) -> Result<()> {
    let json = serde_json::to_string_pretty(artifact).context("serialize bench results")?;
    std::fs::write(path, json).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

// ── Markdown summary rendering ────────────────────────────────────────────

/// Render the benchmark summary as a Markdown table, rows in table
/// registration order. Excluded entries are listed below the table with
/// their failure stage.
pub fn render_bench_summary_md(artifact: &BenchResultsArtifact) -> String {
    let mut out = String::new();
    out.push_str("# serbench results\n\n");
    out.push_str(&format!(
        "- run: `{}`\n- sample: `{}`\n- iterations: {} × {} trials\n\n",
        artifact.run_id, artifact.sample_digest, artifact.iterations, artifact.trials
    ));

    out.push_str("| entry | group | size (B) | zlib (B) | ser ns/op | deser ns/op |\n");
    out.push_str("|---|---|---:|---:|---:|---:|\n");
    for row in artifact.rows.iter().filter(|r| r.verified) {
        let t = row.timing.as_ref().expect("verified row has timing");
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.entry, row.group, t.size_bytes, t.compressed_bytes, t.ser_nanos, t.deser_nanos
        ));
    }

    let excluded: Vec<_> = artifact.rows.iter().filter(|r| !r.verified).collect();
    if !excluded.is_empty() {
        out.push_str("\n## Excluded (failed verification)\n\n");
        for row in excluded {
            out.push_str(&format!(
                "- `{}` failed at stage `{}`\n",
                row.entry,
                row.failure_stage.as_deref().unwrap_or("unknown")
            ));
        }
    }
    out
}

/// Write the Markdown summary.
pub fn write_bench_summary_md(path: &Path, artifact: &BenchResultsArtifact) -> Result<()> {
    let md = render_bench_summary_md(artifact);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
