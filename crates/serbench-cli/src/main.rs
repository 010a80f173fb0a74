//! serbench - Serialization Codec Benchmark Harness
//!
//! The `serbench` command verifies and times every registered codec against
//! the canonical media sample.
//!
//! ## Commands
//!
//! - `list`: Show registered codec entries by format family
//! - `verify`: Run the round-trip correctness sweep
//! - `bench`: Verify, then time serialize/deserialize for passing entries

mod bench;
mod report;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use tracing::{info, warn, Level};
use uuid::Uuid;

use serbench_codecs::default_registry;
use serbench_core::{
    emit_entry_timed, emit_entry_verified, emit_sweep_finished, emit_sweep_started,
    verify_parallel, MediaContent,
    Registry, VerificationOutcome, VerifySpan, METRICS,
};

use bench::{time_entry, BenchConfig};
use report::{
    render_bench_summary_md, sample_digest, write_bench_results_json, write_bench_summary_md,
    write_verify_results_json, BenchResultsArtifact, BenchRow, VerifyResultsArtifact,
};

#[derive(Parser)]
#[command(name = "serbench")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serialization codec benchmark harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show registered codec entries grouped by format family
    List,

    /// Run the round-trip correctness sweep over the full table
    Verify {
        /// Worker count for the parallel sweep
        #[arg(short, long, default_value_t = 4)]
        workers: usize,

        /// Only report entries whose name matches this regex
        #[arg(short, long)]
        filter: Option<String>,

        /// Write verify_results.json to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Verify, then time serialize/deserialize for correctness-passing entries
    Bench {
        /// Operations per trial
        #[arg(long, default_value_t = 2_000)]
        iterations: u32,

        /// Trials per entry (best trial wins)
        #[arg(long, default_value_t = 5)]
        trials: u32,

        /// Warm-up budget per entry, in milliseconds
        #[arg(long, default_value_t = 250)]
        warmup_ms: u64,

        /// Only time entries whose name matches this regex
        #[arg(short, long)]
        filter: Option<String>,

        /// Directory to write bench_results.json and bench_summary.md into
        #[arg(long, default_value = ".")]
        report_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    serbench_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Verify {
            workers,
            filter,
            report,
        } => cmd_verify(workers, filter.as_deref(), report.as_deref()).await,
        Commands::Bench {
            iterations,
            trials,
            warmup_ms,
            filter,
            report_dir,
        } => {
            let config = BenchConfig {
                iterations,
                trials,
                warmup: Duration::from_millis(warmup_ms),
            };
            cmd_bench(config, filter.as_deref(), &report_dir).await
        }
    }
}

fn parse_filter(filter: Option<&str>) -> Result<Option<Regex>> {
    filter
        .map(|f| Regex::new(f).with_context(|| format!("invalid filter regex: {f}")))
        .transpose()
}

fn matches(filter: &Option<Regex>, name: &str) -> bool {
    filter.as_ref().map_or(true, |re| re.is_match(name))
}

/// Show registered codec entries grouped by format family
fn cmd_list() -> Result<()> {
    let registry = default_registry();
    for group in registry.groups() {
        println!("{}:", group.label());
        for entry in group.entries() {
            println!("  {}", entry.name());
        }
    }
    println!("{} entries", registry.len());
    Ok(())
}

/// Run the correctness sweep and return outcomes in table order.
async fn run_sweep(
    registry: &Arc<Registry<MediaContent>>,
    sample: &MediaContent,
    workers: usize,
    run_id: &Uuid,
) -> Vec<VerificationOutcome> {
    let start = Instant::now();
    emit_sweep_started(&run_id.to_string(), registry.len(), 1, workers);

    let samples = Arc::new(vec![sample.clone()]);
    let outcomes = verify_parallel(Arc::clone(registry), samples, workers).await;

    let passed = outcomes.iter().filter(|o| o.passed()).count();
    emit_sweep_finished(
        &run_id.to_string(),
        start.elapsed().as_millis() as u64,
        passed,
        outcomes.len() - passed,
    );
    outcomes
}

/// Run the round-trip correctness sweep over the full table
async fn cmd_verify(workers: usize, filter: Option<&str>, report: Option<&std::path::Path>) -> Result<()> {
    let filter = parse_filter(filter)?;
    let run_id = Uuid::new_v4();
    let _span = VerifySpan::enter(&run_id.to_string());

    let registry = Arc::new(default_registry());
    let sample = MediaContent::standard_sample();
    let outcomes = run_sweep(&registry, &sample, workers, &run_id).await;

    let reported: Vec<VerificationOutcome> = outcomes
        .into_iter()
        .filter(|o| matches(&filter, &o.entry_name))
        .collect();

    for outcome in &reported {
        emit_entry_verified(
            &run_id.to_string(),
            &outcome.entry_name,
            outcome.stage.name(),
            outcome.passed(),
        );
        if outcome.passed() {
            println!("PASS  {}", outcome.entry_name);
        } else {
            println!("FAIL  {}  at {}", outcome.entry_name, outcome.stage);
            if let Some(detail) = &outcome.detail {
                for line in detail.lines() {
                    println!("      {line}");
                }
            }
        }
    }

    let failed = reported.iter().filter(|o| o.failed).count();
    println!("{} verified, {} failed", reported.len() - failed, failed);

    if let Some(path) = report {
        let artifact =
            VerifyResultsArtifact::new(run_id, sample_digest(&sample)?, reported);
        write_verify_results_json(path, &artifact)?;
        info!(path = ?path, "wrote verify results");
    }

    METRICS.flush();
    Ok(())
}

/// Verify, then time serialize/deserialize for correctness-passing entries
async fn cmd_bench(config: BenchConfig, filter: Option<&str>, report_dir: &std::path::Path) -> Result<()> {
    let filter = parse_filter(filter)?;
    let run_id = Uuid::new_v4();
    let _span = VerifySpan::enter(&run_id.to_string());

    let registry = Arc::new(default_registry());
    let sample = MediaContent::standard_sample();

    // An entry must prove correctness before its speed is meaningful.
    let outcomes = run_sweep(&registry, &sample, 4, &run_id).await;

    let mut rows = Vec::new();
    for (group, entry, outcome) in registry
        .groups()
        .iter()
        .flat_map(|g| g.entries().iter().map(move |e| (g.label(), e)))
        .zip(outcomes.iter())
        .map(|((g, e), o)| (g, e, o))
    {
        if !matches(&filter, entry.name()) {
            continue;
        }
        if outcome.failed {
            warn!(entry = %entry.name(), stage = %outcome.stage, "excluded from timing");
            rows.push(BenchRow {
                entry: entry.name().to_string(),
                group: group.to_string(),
                verified: false,
                failure_stage: Some(outcome.stage.name().to_string()),
                timing: None,
            });
            continue;
        }

        info!(entry = %entry.name(), "timing");
        let timing = match time_entry(entry, &sample, &config) {
            Ok(t) => t,
            Err(e) => {
                // Verified entries can still fail mid-timing (e.g. flaky
                // third-party state); treat it like a verification failure.
                warn!(entry = %entry.name(), error = %e, "timing aborted");
                rows.push(BenchRow {
                    entry: entry.name().to_string(),
                    group: group.to_string(),
                    verified: false,
                    failure_stage: Some("timing".to_string()),
                    timing: None,
                });
                continue;
            }
        };
        emit_entry_timed(
            &run_id.to_string(),
            entry.name(),
            timing.ser_nanos,
            timing.deser_nanos,
            timing.size_bytes,
        );
        rows.push(BenchRow {
            entry: entry.name().to_string(),
            group: group.to_string(),
            verified: true,
            failure_stage: None,
            timing: Some(timing),
        });
    }

    let artifact = BenchResultsArtifact::new(
        run_id,
        sample_digest(&sample)?,
        config.iterations,
        config.trials,
        rows,
    );

    std::fs::create_dir_all(report_dir)
        .with_context(|| format!("create report dir {:?}", report_dir))?;
    write_bench_results_json(&report_dir.join("bench_results.json"), &artifact)?;
    write_bench_summary_md(&report_dir.join("bench_summary.md"), &artifact)?;

    print!("{}", render_bench_summary_md(&artifact));
    METRICS.flush();
    Ok(())
}
