use std::collections::HashMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::model::Platform;

// ---------------------------------------------------------------------------
// RequestOutcome
// ---------------------------------------------------------------------------

/// The result of a single completed request attempt.
///
/// Created once per issued request and consumed immediately by the collector;
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestOutcome {
    pub endpoint: String,
    pub platform: Platform,
    /// Elapsed wall-clock time in fractional milliseconds.
    pub duration_ms: f64,
    /// HTTP status code, or 0 when no response was received.
    pub status_code: u16,
    /// True iff the response status was exactly 200.
    pub succeeded: bool,
    /// Human-readable error message when the request failed at the network level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// SampleKey / SampleSet
// ---------------------------------------------------------------------------

/// Accumulation key: one endpoint pair on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub endpoint: String,
    pub platform: Platform,
}

impl SampleKey {
    pub fn new(endpoint: impl Into<String>, platform: Platform) -> Self {
        Self {
            endpoint: endpoint.into(),
            platform,
        }
    }
}

/// Accumulated raw samples for one (endpoint, platform) key.
///
/// Durations hold successful attempts only; failures are counted but carry no
/// latency sample. Order within the vec is not meaningful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SampleSet {
    durations_ms: Vec<f64>,
    total_attempts: u64,
    failed_attempts: u64,
}

impl SampleSet {
    pub fn record_success(&mut self, duration_ms: f64) {
        self.total_attempts += 1;
        self.durations_ms.push(duration_ms);
    }

    pub fn record_failure(&mut self) {
        self.total_attempts += 1;
        self.failed_attempts += 1;
    }

    /// Successful-attempt durations, in arrival order.
    pub fn durations_ms(&self) -> &[f64] {
        &self.durations_ms
    }

    /// Number of successful attempts.
    pub fn count(&self) -> u64 {
        self.durations_ms.len() as u64
    }

    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts
    }
}

// ---------------------------------------------------------------------------
// MetricsCollector
// ---------------------------------------------------------------------------

/// Concurrent accumulator for request outcomes, keyed by (endpoint, platform).
///
/// An explicit instance is handed to the executor rather than living in any
/// global state. Internally a sharded concurrent map: writers to different
/// keys proceed on separate shards, writers to the same key serialize on the
/// entry, so no update is ever lost.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    samples: DashMap<SampleKey, SampleSet>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed attempt.
    pub fn record(&self, outcome: &RequestOutcome) {
        let key = SampleKey::new(outcome.endpoint.clone(), outcome.platform);
        let mut entry = self.samples.entry(key).or_default();
        if outcome.succeeded {
            entry.record_success(outcome.duration_ms);
        } else {
            entry.record_failure();
        }
    }

    /// Deep-copy snapshot of all sample sets.
    ///
    /// Safe to aggregate at leisure while recording continues on the live map.
    pub fn snapshot(&self) -> HashMap<SampleKey, SampleSet> {
        self.samples
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Cheap (total attempts, failed attempts) totals across all keys,
    /// for progress reporting.
    pub fn counts(&self) -> (u64, u64) {
        let mut total = 0;
        let mut failed = 0;
        for entry in self.samples.iter() {
            total += entry.total_attempts();
            failed += entry.failed_attempts();
        }
        (total, failed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn make_outcome(endpoint: &str, platform: Platform, ms: f64, ok: bool) -> RequestOutcome {
        RequestOutcome {
            endpoint: endpoint.to_string(),
            platform,
            duration_ms: ms,
            status_code: if ok { 200 } else { 500 },
            succeeded: ok,
            error: None,
        }
    }

    // -----------------------------------------------------------------------
    // record
    // -----------------------------------------------------------------------

    #[test]
    fn record_success_appends_duration() {
        let collector = MetricsCollector::new();
        collector.record(&make_outcome("search", Platform::Baseline, 12.5, true));
        collector.record(&make_outcome("search", Platform::Baseline, 8.0, true));

        let snap = collector.snapshot();
        let set = &snap[&SampleKey::new("search", Platform::Baseline)];
        assert_eq!(set.count(), 2);
        assert_eq!(set.total_attempts(), 2);
        assert_eq!(set.failed_attempts(), 0);
        assert_eq!(set.durations_ms(), &[12.5, 8.0]);
    }

    #[test]
    fn record_failure_counts_without_a_sample() {
        let collector = MetricsCollector::new();
        collector.record(&make_outcome("search", Platform::Candidate, 30.0, false));

        let snap = collector.snapshot();
        let set = &snap[&SampleKey::new("search", Platform::Candidate)];
        assert_eq!(set.count(), 0);
        assert_eq!(set.total_attempts(), 1);
        assert_eq!(set.failed_attempts(), 1);
        assert!(set.durations_ms().is_empty());
    }

    #[test]
    fn platforms_accumulate_separately() {
        let collector = MetricsCollector::new();
        collector.record(&make_outcome("search", Platform::Baseline, 10.0, true));
        collector.record(&make_outcome("search", Platform::Candidate, 20.0, true));

        let snap = collector.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(
            snap[&SampleKey::new("search", Platform::Baseline)].durations_ms(),
            &[10.0]
        );
        assert_eq!(
            snap[&SampleKey::new("search", Platform::Candidate)].durations_ms(),
            &[20.0]
        );
    }

    // -----------------------------------------------------------------------
    // snapshot
    // -----------------------------------------------------------------------

    #[test]
    fn snapshot_is_independent_of_later_recording() {
        let collector = MetricsCollector::new();
        collector.record(&make_outcome("search", Platform::Baseline, 10.0, true));
        let snap = collector.snapshot();

        collector.record(&make_outcome("search", Platform::Baseline, 99.0, true));
        assert_eq!(
            snap[&SampleKey::new("search", Platform::Baseline)].count(),
            1
        );
    }

    #[test]
    fn snapshot_of_empty_collector_is_empty() {
        let collector = MetricsCollector::new();
        assert!(collector.snapshot().is_empty());
    }

    // -----------------------------------------------------------------------
    // counts
    // -----------------------------------------------------------------------

    #[test]
    fn counts_sum_over_all_keys() {
        let collector = MetricsCollector::new();
        collector.record(&make_outcome("a", Platform::Baseline, 1.0, true));
        collector.record(&make_outcome("a", Platform::Candidate, 1.0, false));
        collector.record(&make_outcome("b", Platform::Baseline, 1.0, false));
        assert_eq!(collector.counts(), (3, 2));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_same_key_recording_loses_no_updates() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let collector = Arc::new(MetricsCollector::new());
        let mut handles = Vec::new();
        for t in 0..THREADS {
            let collector = Arc::clone(&collector);
            handles.push(std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let ms = (t * PER_THREAD + i) as f64;
                    collector.record(&make_outcome("hot", Platform::Baseline, ms, true));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread should not panic");
        }

        let snap = collector.snapshot();
        let set = &snap[&SampleKey::new("hot", Platform::Baseline)];
        assert_eq!(set.count() as usize, THREADS * PER_THREAD);
        assert_eq!(set.total_attempts() as usize, THREADS * PER_THREAD);
    }

    #[test]
    fn concurrent_disjoint_keys_do_not_interfere() {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 200;

        let collector = Arc::new(MetricsCollector::new());
        let mut handles = Vec::new();
        for t in 0..THREADS {
            let collector = Arc::clone(&collector);
            handles.push(std::thread::spawn(move || {
                let endpoint = format!("endpoint-{t}");
                for _ in 0..PER_THREAD {
                    collector.record(&make_outcome(&endpoint, Platform::Candidate, 5.0, true));
                }
            }));
        }
        for handle in handles {
            handle.join().expect("thread should not panic");
        }

        let snap = collector.snapshot();
        assert_eq!(snap.len(), THREADS);
        for t in 0..THREADS {
            let key = SampleKey::new(format!("endpoint-{t}"), Platform::Candidate);
            assert_eq!(snap[&key].count() as usize, PER_THREAD);
        }
    }
}
