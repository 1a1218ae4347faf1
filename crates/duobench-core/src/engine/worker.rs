use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::catalog::model::{Platform, RequestSpec};
use crate::engine::collector::MetricsCollector;
use crate::http::request::send_request;

/// Run a single concurrent worker: issue requests back-to-back against one
/// (endpoint, platform) until the deadline passes.
///
/// Outcomes completing before `measure_from` belong to the warm-up phase and
/// are discarded; everything after is recorded. Cancellation is checked
/// between requests, never mid-request.
pub async fn run_worker(
    client: Arc<reqwest::Client>,
    endpoint: String,
    platform: Platform,
    spec: RequestSpec,
    collector: Arc<MetricsCollector>,
    measure_from: Instant,
    deadline: Instant,
    cancel: CancellationToken,
) {
    while Instant::now() < deadline {
        if cancel.is_cancelled() {
            return;
        }

        let outcome = send_request(&client, &endpoint, platform, &spec).await;

        if Instant::now() >= measure_from {
            collector.record(&outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn expired_deadline_issues_no_requests() {
        let collector = Arc::new(MetricsCollector::new());
        let client = Arc::new(reqwest::Client::new());
        let now = Instant::now();

        run_worker(
            client,
            "pair".to_string(),
            Platform::Baseline,
            RequestSpec::get("http://192.0.2.1/none"),
            Arc::clone(&collector),
            now,
            now, // already past
            CancellationToken::new(),
        )
        .await;

        assert_eq!(collector.counts(), (0, 0));
    }

    #[tokio::test]
    async fn cancelled_worker_stops_before_sending() {
        let collector = Arc::new(MetricsCollector::new());
        let client = Arc::new(reqwest::Client::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        run_worker(
            client,
            "pair".to_string(),
            Platform::Candidate,
            RequestSpec::get("http://192.0.2.1/none"),
            Arc::clone(&collector),
            Instant::now(),
            Instant::now() + Duration::from_secs(60),
            cancel,
        )
        .await;

        assert_eq!(collector.counts(), (0, 0));
    }
}
