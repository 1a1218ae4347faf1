use std::time::Duration;

pub mod aggregator;
pub mod collector;
pub mod executor;
pub mod worker;

pub use aggregator::{summarize, EndpointSummary, LatencyStats};
pub use collector::{MetricsCollector, RequestOutcome, SampleKey, SampleSet};
pub use executor::{run_catalog, ExecutorConfig};

/// How traffic is generated for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// One request at a time: every pair, both platforms, `calls` attempts each.
    Sequential { calls: u32 },
    /// Per pair, `workers` concurrent tasks per platform: a warm-up phase
    /// whose outcomes are discarded, then a steady-state measurement phase.
    Concurrent {
        workers: u32,
        warmup: Duration,
        duration: Duration,
    },
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunMode::Sequential { .. } => "sequential",
            RunMode::Concurrent { .. } => "load",
        };
        write!(f, "{s}")
    }
}
