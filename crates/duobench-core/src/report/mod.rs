pub mod export;
pub mod render;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::model::{EndpointPair, Platform};
use crate::engine::aggregator::{summarize, EndpointSummary};
use crate::engine::collector::{SampleKey, SampleSet};
use crate::engine::RunMode;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Classification bands, in percent.
///
/// `pair_percent` is a noise-tolerance band, not a statistical significance
/// test: average deltas within ±pair_percent are called similar. The overall
/// band is coarser because it applies to a mean of per-pair means.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Thresholds {
    pub pair_percent: f64,
    pub overall_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pair_percent: 5.0,
            overall_percent: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict / Deltas / EndpointComparison
// ---------------------------------------------------------------------------

/// Relative performance classification of one endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Candidate is meaningfully faster than baseline.
    Improved,
    /// Candidate is meaningfully slower than baseline.
    Degraded,
    /// Within the noise-tolerance band.
    Similar,
    /// At least one side produced no successful samples.
    NoData,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Improved => "improved",
            Verdict::Degraded => "degraded",
            Verdict::Similar => "similar",
            Verdict::NoData => "no data",
        };
        write!(f, "{s}")
    }
}

/// Candidate-minus-baseline differences across the latency statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Deltas {
    pub avg_ms: f64,
    /// Average delta relative to the baseline average, in percent.
    /// `None` when the baseline average is zero; never a division by zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_percent: Option<f64>,
    pub min_ms: f64,
    pub max_ms: f64,
    pub p99_ms: f64,
}

/// Full comparison result for one endpoint pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EndpointComparison {
    pub name: String,
    pub baseline_url: String,
    pub candidate_url: String,
    pub baseline: EndpointSummary,
    pub candidate: EndpointSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deltas: Option<Deltas>,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Overall verdict / totals / report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallVerdict {
    CandidateFaster,
    BaselineFaster,
    Similar,
    NoData,
}

impl OverallVerdict {
    pub fn recommendation(&self) -> &'static str {
        match self {
            OverallVerdict::CandidateFaster => {
                "Candidate deployment responds faster on average; favour it for latency-sensitive traffic."
            }
            OverallVerdict::BaselineFaster => {
                "Baseline deployment responds faster on average; investigate candidate regressions before migrating."
            }
            OverallVerdict::Similar => {
                "Latency is comparable across deployments; weigh other factors for the final call."
            }
            OverallVerdict::NoData => {
                "No endpoint pair produced comparable data; check connectivity and credentials."
            }
        }
    }
}

impl std::fmt::Display for OverallVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OverallVerdict::CandidateFaster => "candidate is better overall",
            OverallVerdict::BaselineFaster => "baseline is better overall",
            OverallVerdict::Similar => "similar, weigh other factors",
            OverallVerdict::NoData => "no data",
        };
        write!(f, "{s}")
    }
}

/// Tally across all endpoint pairs of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunTotals {
    pub improved: usize,
    pub degraded: usize,
    pub similar: usize,
    pub no_data: usize,
    /// Pairs that produced data on both sides and entered the tally.
    pub compared: usize,
    /// Mean of per-pair average percent deltas across compared pairs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_avg_percent: Option<f64>,
    pub verdict: OverallVerdict,
    pub recommendation: String,
}

/// Complete machine-readable result of one comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub mode: String,
    pub comparisons: Vec<EndpointComparison>,
    pub totals: RunTotals,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Compare the two summaries of one endpoint pair.
///
/// Deltas are candidate minus baseline. A pair where either side has no
/// successful samples, or where the baseline average is zero and the percent
/// is undefined, is classified [`Verdict::NoData`] and stays out of the
/// improved/degraded/similar tally.
pub fn compare_pair(
    pair: &EndpointPair,
    baseline: EndpointSummary,
    candidate: EndpointSummary,
    thresholds: &Thresholds,
) -> EndpointComparison {
    let deltas = match (&baseline.latency, &candidate.latency) {
        (Some(a), Some(b)) => Some(Deltas {
            avg_ms: b.avg_ms - a.avg_ms,
            avg_percent: if a.avg_ms > 0.0 {
                Some((b.avg_ms - a.avg_ms) / a.avg_ms * 100.0)
            } else {
                None
            },
            min_ms: b.min_ms - a.min_ms,
            max_ms: b.max_ms - a.max_ms,
            p99_ms: b.p99_ms - a.p99_ms,
        }),
        _ => None,
    };

    let verdict = match deltas.as_ref().and_then(|d| d.avg_percent) {
        Some(percent) if percent < -thresholds.pair_percent => Verdict::Improved,
        Some(percent) if percent > thresholds.pair_percent => Verdict::Degraded,
        Some(_) => Verdict::Similar,
        None => Verdict::NoData,
    };

    EndpointComparison {
        name: pair.name.clone(),
        baseline_url: pair.baseline.url.clone(),
        candidate_url: pair.candidate.url.clone(),
        baseline,
        candidate,
        deltas,
        verdict,
    }
}

/// Build the full report from a collector snapshot.
///
/// Pairs keep catalog order. A key missing from the snapshot (that platform
/// never completed a request) yields an explicit no-data summary rather than
/// being dropped.
pub fn build_report(
    catalog: &[EndpointPair],
    snapshot: &HashMap<SampleKey, SampleSet>,
    mode: &RunMode,
    thresholds: &Thresholds,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> RunReport {
    let comparisons: Vec<EndpointComparison> = catalog
        .iter()
        .map(|pair| {
            let summary_for = |platform: Platform| {
                snapshot
                    .get(&SampleKey::new(pair.name.clone(), platform))
                    .map(summarize)
                    .unwrap_or_else(EndpointSummary::no_data)
            };
            compare_pair(
                pair,
                summary_for(Platform::Baseline),
                summary_for(Platform::Candidate),
                thresholds,
            )
        })
        .collect();

    let totals = tally(&comparisons, thresholds);

    RunReport {
        run_id: Uuid::new_v4(),
        started_at,
        finished_at,
        mode: mode.to_string(),
        comparisons,
        totals,
    }
}

/// Reduce per-pair verdicts into run totals and the overall verdict.
fn tally(comparisons: &[EndpointComparison], thresholds: &Thresholds) -> RunTotals {
    let mut improved = 0;
    let mut degraded = 0;
    let mut similar = 0;
    let mut no_data = 0;
    for comparison in comparisons {
        match comparison.verdict {
            Verdict::Improved => improved += 1,
            Verdict::Degraded => degraded += 1,
            Verdict::Similar => similar += 1,
            Verdict::NoData => no_data += 1,
        }
    }

    let percents: Vec<f64> = comparisons
        .iter()
        .filter_map(|c| c.deltas.as_ref().and_then(|d| d.avg_percent))
        .collect();
    let mean_avg_percent = if percents.is_empty() {
        None
    } else {
        Some(percents.iter().sum::<f64>() / percents.len() as f64)
    };

    let verdict = match mean_avg_percent {
        None => OverallVerdict::NoData,
        Some(mean) if mean < -thresholds.overall_percent => OverallVerdict::CandidateFaster,
        Some(mean) if mean > thresholds.overall_percent => OverallVerdict::BaselineFaster,
        Some(_) => OverallVerdict::Similar,
    };

    RunTotals {
        improved,
        degraded,
        similar,
        no_data,
        compared: percents.len(),
        mean_avg_percent,
        verdict,
        recommendation: verdict.recommendation().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
