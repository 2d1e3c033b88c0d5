use serde::{Deserialize, Serialize};

/// Aggregate counters reported by a finished run.
///
/// Field names follow the runner's report keys (`totalDuration`, `totalSuites`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCounts {
    /// Wall-clock duration of the run in milliseconds.
    pub total_duration: u64,
    pub total_suites: u64,
    pub total_tests: u64,
    pub total_failed: u64,
    pub total_passed: u64,
    pub total_pending: u64,
    pub total_skipped: u64,
}
