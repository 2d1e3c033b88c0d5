use std::sync::Arc;

use soak_model::{RunNumber, RunOutcome, Target};
use soak_prometheus::MetricsModel;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{error::OrchestratorError, publish::Publisher, runner::TestRunner};

mod config;
pub use config::{IterLimit, OrchestratorConfig};

/// Totals of a completed orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Runner invocations performed.
    pub runs: u64,
    /// Invocations that did not finish, including those that raised.
    pub unfinished: u64,
}

/// Sequential control loop: every target, every iteration, one runner invocation at a time.
///
/// Per run: invoke the runner, record the outcome, publish a snapshot, then wait the configured delay
/// (except after the very last run).
pub struct Orchestrator {
    targets: Vec<Target>,
    runner: Arc<dyn TestRunner>,
    publisher: Arc<dyn Publisher>,
    metrics: MetricsModel,
    cfg: OrchestratorConfig,
    shutdown: Option<CancellationToken>,
}

impl Orchestrator {
    pub fn new(
        targets: Vec<Target>,
        runner: Arc<dyn TestRunner>,
        publisher: Arc<dyn Publisher>,
        metrics: MetricsModel,
        cfg: OrchestratorConfig,
    ) -> Self {
        Self {
            targets,
            runner,
            publisher,
            metrics,
            cfg,
            shutdown: None,
        }
    }

    /// Token cancelled once every run is done.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Drive all runs to completion.
    ///
    /// Runner errors are recorded as unfinished runs and do not stop the loop;
    /// the last one is returned after the final run. Never returns with an unlimited iteration limit.
    pub async fn run(self) -> Result<RunSummary, OrchestratorError> {
        info!(
            runner = self.runner.name(),
            targets = self.targets.len(),
            iter_limit = ?self.cfg.iter_limit,
            delay_ms = self.cfg.delay.as_millis() as u64,
            "starting test runs"
        );

        let mut summary = RunSummary::default();
        let mut failures: u64 = 0;
        let mut last_error = None;
        let mut run: RunNumber = 0;

        let total = self.targets.len();
        for (idx, target) in self.targets.iter().enumerate() {
            let last_target = idx + 1 == total;
            let mut iteration: u64 = 0;

            while self.cfg.iter_limit.allows(iteration + 1) {
                iteration += 1;
                run += 1;

                let outcome = match self.invoke(target, iteration, run).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        error!(target_name = target.name(), iteration, run, error = %e, "runner invocation failed");
                        failures += 1;
                        let outcome = RunOutcome::not_finished(e.to_string());
                        last_error = Some(e);
                        outcome
                    }
                };
                if !outcome.status().is_finished() {
                    summary.unfinished += 1;
                }
                self.metrics.record_outcome(target.name(), &outcome);
                summary.runs += 1;

                if let Err(e) = self.publisher.publish(&self.metrics.snapshot(), run).await {
                    debug!(run, error = %e, "snapshot not published; continuing");
                }

                let more = self.cfg.iter_limit.allows(iteration + 1);
                if more || !last_target {
                    self.pause().await;
                }
            }
        }

        info!(runs = summary.runs, unfinished = summary.unfinished, "Done! all test runs completed");
        if let Some(token) = &self.shutdown {
            token.cancel();
        }

        match last_error {
            Some(last) => Err(OrchestratorError::Runner { failures, last }),
            None => Ok(summary),
        }
    }

    #[instrument(level = "debug", skip(self, target), fields(target_name = %target.name()))]
    async fn invoke(
        &self,
        target: &Target,
        iteration: u64,
        run: RunNumber,
    ) -> Result<RunOutcome, crate::RunnerError> {
        info!(target_name = target.name(), iteration, run, "running tests");
        let outcome = self.runner.run(target).await?;
        match &outcome {
            RunOutcome::Finished(report) => info!(
                target_name = target.name(),
                iteration,
                tests = report.counts.total_tests,
                passed = report.counts.total_passed,
                failed = report.counts.total_failed,
                duration_ms = report.counts.total_duration,
                "runner finished"
            ),
            RunOutcome::NotFinished { reason } => warn!(
                target_name = target.name(),
                iteration,
                %reason,
                "runner did not finish"
            ),
        }
        Ok(outcome)
    }

    async fn pause(&self) {
        if self.cfg.delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.cfg.delay.as_millis() as u64, "waiting before next run");
        tokio::time::sleep(self.cfg.delay).await;
    }
}
