use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal status of one runner invocation.
///
/// Anything other than a completed run (crash, timeout, internal runner error) collapses into `NotFinished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// The runner completed and produced a full report.
    Finished,
    /// The runner did not complete.
    NotFinished,
}

impl RunStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunStatus::Finished)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Finished => "finished",
            RunStatus::NotFinished => "not-finished",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
