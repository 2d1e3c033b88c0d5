use async_trait::async_trait;
use soak_model::{RunOutcome, Target};

use crate::error::RunnerError;

/// External test runner.
///
/// Implementations invoke the runner once, scoped to `target`, and wait for it to complete.
/// A run whose tests fail is still `Ok`; `Err` means no structured outcome could be obtained.
/// Invocations are never overlapped, so implementations may rely on shared working state.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn run(&self, target: &Target) -> Result<RunOutcome, RunnerError>;
}
