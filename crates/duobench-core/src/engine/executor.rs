use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::catalog::model::{EndpointPair, Platform};
use crate::engine::collector::MetricsCollector;
use crate::engine::worker::run_worker;
use crate::engine::RunMode;
use crate::error::DuobenchError;
use crate::http::request::{build_client, send_request};

/// Configuration for one traffic-generation run.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub mode: RunMode,
    /// Per-request timeout applied by the shared HTTP client.
    pub request_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Sequential { calls: 20 },
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Drive the whole catalog through one run, recording every measured outcome
/// into `collector`.
///
/// Cancellation is checked between requests; a request in flight when the
/// token fires completes or times out per the client's own timeout. Pairs are
/// executed in catalog order.
pub async fn run_catalog(
    catalog: &[EndpointPair],
    collector: Arc<MetricsCollector>,
    config: &ExecutorConfig,
    cancel: CancellationToken,
) -> Result<(), DuobenchError> {
    if catalog.is_empty() {
        return Err(DuobenchError::Engine(
            "Catalog has no endpoint pairs to run".to_string(),
        ));
    }
    if let RunMode::Concurrent { workers: 0, .. } = config.mode {
        return Err(DuobenchError::Engine(
            "Concurrent mode needs at least one worker".to_string(),
        ));
    }

    let client = Arc::new(build_client(config.request_timeout)?);

    // Periodic progress logging while the run is in flight.
    let progress_task = tokio::spawn(progress_loop(Arc::clone(&collector), cancel.clone()));

    match config.mode {
        RunMode::Sequential { calls } => {
            run_sequential(catalog, &client, &collector, calls, &cancel).await;
        }
        RunMode::Concurrent {
            workers,
            warmup,
            duration,
        } => {
            run_concurrent(
                catalog, &client, &collector, workers, warmup, duration, &cancel,
            )
            .await;
        }
    }

    progress_task.abort();
    Ok(())
}

/// Sequential mode: one request at a time, `calls` attempts per platform,
/// baseline first, so both sides of a pair run under the same conditions.
async fn run_sequential(
    catalog: &[EndpointPair],
    client: &Arc<reqwest::Client>,
    collector: &Arc<MetricsCollector>,
    calls: u32,
    cancel: &CancellationToken,
) {
    for pair in catalog {
        for platform in [Platform::Baseline, Platform::Candidate] {
            let spec = pair.spec(platform);
            tracing::info!(pair = %pair.name, %platform, calls, url = %spec.url, "testing endpoint");

            for _ in 0..calls {
                if cancel.is_cancelled() {
                    tracing::info!("run cancelled, stopping");
                    return;
                }
                let outcome = send_request(client, &pair.name, platform, spec).await;
                if let Some(error) = &outcome.error {
                    tracing::debug!(pair = %pair.name, %platform, error, "request failed");
                }
                collector.record(&outcome);
            }
        }
    }
}

/// Concurrent mode: per pair, `workers` tasks per platform run a warm-up
/// phase followed by a fixed-duration measurement phase. Both platforms are
/// loaded simultaneously so they face identical conditions.
async fn run_concurrent(
    catalog: &[EndpointPair],
    client: &Arc<reqwest::Client>,
    collector: &Arc<MetricsCollector>,
    workers: u32,
    warmup: Duration,
    duration: Duration,
    cancel: &CancellationToken,
) {
    for pair in catalog {
        if cancel.is_cancelled() {
            tracing::info!("run cancelled, stopping");
            return;
        }

        tracing::info!(
            pair = %pair.name,
            workers,
            warmup_secs = warmup.as_secs(),
            duration_secs = duration.as_secs(),
            "starting load phase"
        );

        let start = Instant::now();
        let measure_from = start + warmup;
        let deadline = measure_from + duration;

        let mut join_set: JoinSet<()> = JoinSet::new();
        for platform in [Platform::Baseline, Platform::Candidate] {
            let spec = pair.spec(platform).clone();
            for _ in 0..workers {
                join_set.spawn(run_worker(
                    Arc::clone(client),
                    pair.name.clone(),
                    platform,
                    spec.clone(),
                    Arc::clone(collector),
                    measure_from,
                    deadline,
                    cancel.clone(),
                ));
            }
        }

        while join_set.join_next().await.is_some() {}
    }
}

/// Log accumulated totals once per second until cancelled (or aborted).
async fn progress_loop(collector: Arc<MetricsCollector>, cancel: CancellationToken) {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let (total, failed) = collector.counts();
                if total > 0 {
                    tracing::info!(total, failed, "progress");
                }
            }
            _ = cancel.cancelled() => break,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
