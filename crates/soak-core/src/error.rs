use thiserror::Error;

use soak_prometheus::MetricsError;

/// The runner invocation itself failed; no structured outcome exists.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn runner: {0}")]
    Spawn(String),

    #[error("runner io error: {0}")]
    Io(String),

    #[error("runner terminated by signal")]
    KilledBySignal,

    #[error("runner produced no report (exit code: {code:?})")]
    MissingReport { code: Option<i32> },

    #[error("invalid runner report: {0}")]
    InvalidReport(String),
}

impl From<std::io::Error> for RunnerError {
    fn from(e: std::io::Error) -> Self {
        RunnerError::Io(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),

    #[error("gateway request failed: {0}")]
    Transport(String),

    #[error("gateway rejected push: status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to encode metrics: {0}")]
    Encode(#[from] MetricsError),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// At least one runner invocation raised; surfaced after all runs completed.
    #[error("{failures} runner invocation(s) failed; last error: {last}")]
    Runner {
        failures: u64,
        #[source]
        last: RunnerError,
    },
}
