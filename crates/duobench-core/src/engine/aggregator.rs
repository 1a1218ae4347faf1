use serde::{Deserialize, Serialize};

use crate::engine::collector::SampleSet;

// ---------------------------------------------------------------------------
// LatencyStats / EndpointSummary
// ---------------------------------------------------------------------------

/// Latency statistics over the successful samples of one key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LatencyStats {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p99_ms: f64,
}

/// Derived summary for one (endpoint, platform) key over one run.
///
/// `latency` is `None` when the key saw no successful samples; that is the
/// explicit no-data marker. Error rate is reported separately so availability
/// never leaks into the latency statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointSummary {
    /// Number of successful samples.
    pub count: u64,
    pub total_attempts: u64,
    pub failed_attempts: u64,
    /// failed / total attempts, in [0, 1]; 0 when nothing was attempted.
    pub error_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyStats>,
}

impl EndpointSummary {
    /// A summary for a key that was never attempted at all.
    pub fn no_data() -> Self {
        Self {
            count: 0,
            total_attempts: 0,
            failed_attempts: 0,
            error_rate: 0.0,
            latency: None,
        }
    }
}

// ---------------------------------------------------------------------------
// summarize
// ---------------------------------------------------------------------------

/// Reduce a sample set into summary statistics.
///
/// Statistics are recomputed from scratch on every call; nothing is
/// maintained incrementally.
pub fn summarize(samples: &SampleSet) -> EndpointSummary {
    let total = samples.total_attempts();
    let failed = samples.failed_attempts();
    let error_rate = if total > 0 {
        failed as f64 / total as f64
    } else {
        0.0
    };

    let durations = samples.durations_ms();
    let latency = if durations.is_empty() {
        None
    } else {
        let mut sorted = durations.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));
        let sum: f64 = sorted.iter().sum();
        Some(LatencyStats {
            avg_ms: sum / sorted.len() as f64,
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
            p99_ms: percentile(&sorted, 99.0),
        })
    };

    EndpointSummary {
        count: samples.count(),
        total_attempts: total,
        failed_attempts: failed,
        error_rate,
        latency,
    }
}

/// Nearest-rank percentile over an already-sorted slice.
///
/// `p` must be in the range (0.0, 100.0]. The rank is
/// `ceil(p / 100 * n) - 1`, clamped to `[0, n - 1]`.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    let idx = idx.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
