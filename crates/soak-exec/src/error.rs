use soak_core::RunnerError;
use thiserror::Error;

/// Why a runner's stdout could not be turned into an outcome.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no json report found in runner output")]
    Missing,
    #[error("malformed report: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("finished report lacks `{0}`")]
    MissingField(&'static str),
    #[error("bad timestamp in `{field}`: {value}")]
    Timestamp { field: &'static str, value: String },
}

impl From<ReportError> for RunnerError {
    fn from(e: ReportError) -> Self {
        RunnerError::InvalidReport(e.to_string())
    }
}
