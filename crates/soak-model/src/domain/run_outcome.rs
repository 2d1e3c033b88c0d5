use crate::{EpochMs, RunCounts, RunStatus};

/// Data carried by a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// When the runner started executing tests.
    pub started_at: EpochMs,
    /// When the runner finished executing tests.
    pub ended_at: EpochMs,
    pub counts: RunCounts,
}

/// Result of one runner invocation.
///
/// Produced once, consumed by the metrics model, then dropped.
/// Timing and counters exist only for finished runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Finished(RunReport),
    /// Run did not complete; carries the status string the runner reported (or why none was reported).
    NotFinished { reason: String },
}

impl RunOutcome {
    pub fn finished(started_at: EpochMs, ended_at: EpochMs, counts: RunCounts) -> Self {
        RunOutcome::Finished(RunReport {
            started_at,
            ended_at,
            counts,
        })
    }

    pub fn not_finished(reason: impl Into<String>) -> Self {
        RunOutcome::NotFinished {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            RunOutcome::Finished(_) => RunStatus::Finished,
            RunOutcome::NotFinished { .. } => RunStatus::NotFinished,
        }
    }

    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Finished(report) => Some(report),
            RunOutcome::NotFinished { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_outcome_exposes_report() {
        let counts = RunCounts {
            total_tests: 3,
            total_passed: 3,
            ..Default::default()
        };
        let outcome = RunOutcome::finished(1_000, 2_500, counts);

        assert_eq!(outcome.status(), RunStatus::Finished);
        let report = outcome.report().expect("finished outcome has a report");
        assert_eq!(report.started_at, 1_000);
        assert_eq!(report.ended_at, 2_500);
        assert_eq!(report.counts.total_tests, 3);
    }

    #[test]
    fn not_finished_outcome_has_no_report() {
        let outcome = RunOutcome::not_finished("failed");
        assert_eq!(outcome.status(), RunStatus::NotFinished);
        assert!(outcome.report().is_none());
    }
}
