use chrono::SecondsFormat;

use crate::engine::aggregator::EndpointSummary;
use crate::report::{Deltas, RunReport};

const BANNER: &str = "============================================================";
const RULE: &str = "------------------------------------------------------------";

/// Render the full plain-text report.
///
/// One banner-delimited section per endpoint pair, then a summary section
/// with the verdict tally and the recommendation.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&format!("duobench comparison report ({} mode)\n", report.mode));
    out.push_str(&format!("Run ID:   {}\n", report.run_id.hyphenated()));
    out.push_str(&format!(
        "Started:  {}\n",
        report.started_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str(&format!(
        "Finished: {}\n",
        report.finished_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    out.push_str(BANNER);
    out.push('\n');

    for comparison in &report.comparisons {
        out.push('\n');
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("RESULTS FOR: {}\n", comparison.name));
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("Baseline:  {}\n", comparison.baseline_url));
        out.push_str(&format!("Candidate: {}\n", comparison.candidate_url));

        out.push_str("\nBaseline performance:\n");
        push_summary(&mut out, &comparison.baseline);
        out.push_str("\nCandidate performance:\n");
        push_summary(&mut out, &comparison.candidate);

        match &comparison.deltas {
            Some(deltas) => push_deltas(&mut out, deltas),
            None => out.push_str("\nNo data available for comparison.\n"),
        }
        out.push_str(&format!("Verdict: {}\n", comparison.verdict));
    }

    let totals = &report.totals;
    let pairs = report.comparisons.len();
    out.push('\n');
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("SUMMARY\n");
    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&format!("Pairs tested: {pairs}\n"));
    out.push_str(&format!("Improved: {}/{}\n", totals.improved, pairs));
    out.push_str(&format!("Degraded: {}/{}\n", totals.degraded, pairs));
    out.push_str(&format!("Similar:  {}/{}\n", totals.similar, pairs));
    out.push_str(&format!("No data:  {}/{}\n", totals.no_data, pairs));
    match totals.mean_avg_percent {
        Some(mean) => out.push_str(&format!("Mean average delta: {mean:+.1}%\n")),
        None => out.push_str("Mean average delta: no data\n"),
    }
    out.push_str(&format!("Overall verdict: {}\n", totals.verdict));
    out.push_str(&format!("Recommendation: {}\n", totals.recommendation));

    out
}

fn push_summary(out: &mut String, summary: &EndpointSummary) {
    out.push_str(&format!(
        "  Requests: {} total, {} ok, {} failed (error rate {:.1}%)\n",
        summary.total_attempts,
        summary.count,
        summary.failed_attempts,
        summary.error_rate * 100.0
    ));
    match &summary.latency {
        Some(latency) => {
            out.push_str(&format!("  Average:  {}\n", fmt_secs(latency.avg_ms)));
            out.push_str(&format!(
                "  Min/Max:  {} / {}\n",
                fmt_secs(latency.min_ms),
                fmt_secs(latency.max_ms)
            ));
            out.push_str(&format!("  P99:      {}\n", fmt_secs(latency.p99_ms)));
        }
        None => out.push_str("  No successful samples.\n"),
    }
}

fn push_deltas(out: &mut String, deltas: &Deltas) {
    out.push_str("\nDelta (candidate - baseline):\n");
    match deltas.avg_percent {
        Some(percent) => out.push_str(&format!(
            "  Average:  {} ({percent:+.1}%)\n",
            fmt_delta_secs(deltas.avg_ms)
        )),
        None => out.push_str(&format!(
            "  Average:  {} (percent: no data)\n",
            fmt_delta_secs(deltas.avg_ms)
        )),
    }
    out.push_str(&format!("  Min:      {}\n", fmt_delta_secs(deltas.min_ms)));
    out.push_str(&format!("  Max:      {}\n", fmt_delta_secs(deltas.max_ms)));
    out.push_str(&format!("  P99:      {}\n", fmt_delta_secs(deltas.p99_ms)));
}

/// Format a duration in milliseconds as seconds with millisecond precision.
fn fmt_secs(ms: f64) -> String {
    format!("{:.3} s", ms / 1000.0)
}

/// Like [`fmt_secs`] but always signed, for deltas.
fn fmt_delta_secs(ms: f64) -> String {
    format!("{:+.3} s", ms / 1000.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
