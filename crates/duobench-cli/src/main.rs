use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use duobench_core::catalog::{builtin, validate_catalog};
use duobench_core::config::RunConfig;
use duobench_core::engine::{run_catalog, ExecutorConfig, MetricsCollector, RunMode};
use duobench_core::report::export::write_reports;
use duobench_core::report::render::render_text;
use duobench_core::report::{build_report, Thresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One request at a time, a fixed number of calls per endpoint.
    Sequential,
    /// Concurrent workers with a warm-up phase, then a timed steady state.
    Load,
}

#[derive(Debug, Parser)]
#[command(
    name = "duobench",
    about = "Compare endpoint latency between two deployments of the same API",
    version
)]
struct Cli {
    /// Traffic generation mode.
    #[arg(long, value_enum, default_value_t = Mode::Sequential)]
    mode: Mode,

    /// Requests per endpoint and platform (sequential mode).
    #[arg(long, default_value_t = 20)]
    calls: u32,

    /// Concurrent workers per endpoint and platform (load mode).
    #[arg(long, default_value_t = 10)]
    workers: u32,

    /// Warm-up seconds before measurement starts (load mode).
    #[arg(long, default_value_t = 5)]
    warmup_secs: u64,

    /// Measurement seconds per endpoint pair (load mode).
    #[arg(long, default_value_t = 30)]
    duration_secs: u64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Path of the plain-text report.
    #[arg(long, default_value = "duobench-report.txt")]
    text_out: PathBuf,

    /// Path of the JSON report.
    #[arg(long, default_value = "duobench-report.json")]
    json_out: PathBuf,
}

impl Cli {
    fn run_mode(&self) -> RunMode {
        match self.mode {
            Mode::Sequential => RunMode::Sequential { calls: self.calls },
            Mode::Load => RunMode::Concurrent {
                workers: self.workers,
                warmup: Duration::from_secs(self.warmup_secs),
                duration: Duration::from_secs(self.duration_secs),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = RunConfig::from_env().context("Failed to load configuration")?;
    let catalog = builtin(&config);
    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!(%error, "invalid catalog entry");
        }
        anyhow::bail!("Catalog validation failed with {} error(s)", errors.len());
    }

    tracing::info!(
        pairs = catalog.len(),
        baseline = %config.baseline_base_url,
        candidate = %config.candidate_base_url,
        mode = %cli.run_mode(),
        "starting comparison run"
    );

    let collector = Arc::new(MetricsCollector::new());
    let cancel = CancellationToken::new();
    {
        // Ctrl-C stops after the requests in flight; partial data still reports.
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, stopping the run");
                cancel.cancel();
            }
        });
    }

    let executor_config = ExecutorConfig {
        mode: cli.run_mode(),
        request_timeout: Duration::from_secs(cli.timeout_secs),
    };

    let started_at = Utc::now();
    run_catalog(&catalog, Arc::clone(&collector), &executor_config, cancel)
        .await
        .context("Comparison run failed")?;
    let finished_at = Utc::now();

    let snapshot = collector.snapshot();
    let report = build_report(
        &catalog,
        &snapshot,
        &executor_config.mode,
        &Thresholds::default(),
        started_at,
        finished_at,
    );

    println!("{}", render_text(&report));

    write_reports(&report, &cli.text_out, &cli.json_out)
        .context("Failed to write report files")?;
    tracing::info!(
        text = %cli.text_out.display(),
        json = %cli.json_out.display(),
        "reports written"
    );

    Ok(())
}
