use std::collections::HashMap;

use prometheus::{GaugeVec, Opts, Registry};
use soak_model::{DEFAULT_TARGET_LABEL, RunOutcome};
use tracing::{debug, trace};

use crate::{error::MetricsError, snapshot::MetricsSnapshot};

/// Static shape of the metrics model, fixed at startup.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Label key of the per-target dimension.
    pub target_label: String,
    /// Constant label pair attached to every series.
    pub default_label: Option<(String, String)>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            target_label: DEFAULT_TARGET_LABEL.to_string(),
            default_label: None,
        }
    }
}

impl MetricsConfig {
    pub fn with_target_label(mut self, name: impl Into<String>) -> Self {
        self.target_label = name.into();
        self
    }

    pub fn with_default_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_label = Some((name.into(), value.into()));
        self
    }
}

/// Last-known outcome per target, as labelled gauges.
///
/// Single writer (the orchestrator), any number of readers.
/// Writes happen between await points, so readers on the same runtime never observe half an update.
#[derive(Clone)]
pub struct MetricsModel {
    registry: Registry,
    result: GaugeVec,
    started_tests_at: GaugeVec,
    ended_tests_at: GaugeVec,
    total_duration: GaugeVec,
    total_suites: GaugeVec,
    total_tests: GaugeVec,
    total_failed: GaugeVec,
    total_passed: GaugeVec,
    total_pending: GaugeVec,
    total_skipped: GaugeVec,
}

impl MetricsModel {
    /// Create the registry and register every instrument.
    ///
    /// Fails if the label names are not valid Prometheus label names, or if the constant label
    /// reuses the target label key.
    pub fn new(cfg: &MetricsConfig) -> Result<Self, MetricsError> {
        if let Some((name, _)) = &cfg.default_label
            && *name == cfg.target_label
        {
            return Err(MetricsError::LabelCollision(name.clone()));
        }
        let const_labels = cfg
            .default_label
            .clone()
            .map(|(k, v)| HashMap::from([(k, v)]));
        let registry = Registry::new_custom(None, const_labels)?;
        let label = cfg.target_label.as_str();

        let gauge = |name: &str, help: &str| -> Result<GaugeVec, MetricsError> {
            let vec = GaugeVec::new(Opts::new(name, help), &[label])?;
            registry.register(Box::new(vec.clone()))?;
            Ok(vec)
        };

        let model = Self {
            result: gauge("result", "1 if the last run finished, 0 otherwise")?,
            started_tests_at: gauge("startedTestsAt", "start of the last finished run, epoch ms")?,
            ended_tests_at: gauge("endedTestsAt", "end of the last finished run, epoch ms")?,
            total_duration: gauge("totalDuration", "duration of the last finished run, ms")?,
            total_suites: gauge("totalSuites", "suites in the last finished run")?,
            total_tests: gauge("totalTests", "tests in the last finished run")?,
            total_failed: gauge("totalFailed", "failed tests in the last finished run")?,
            total_passed: gauge("totalPassed", "passed tests in the last finished run")?,
            total_pending: gauge("totalPending", "pending tests in the last finished run")?,
            total_skipped: gauge("totalSkipped", "skipped tests in the last finished run")?,
            registry,
        };
        debug!(target_label = %cfg.target_label, default_label = ?cfg.default_label, "metrics registry ready");
        Ok(model)
    }

    /// Overwrite the series of `target` with `outcome`.
    ///
    /// A run that did not finish sets `result` to 0 and clears every other instrument for all targets.
    pub fn record_outcome(&self, target: &str, outcome: &RunOutcome) {
        let labels = [target];
        match outcome {
            RunOutcome::Finished(report) => {
                let c = &report.counts;
                self.result.with_label_values(&labels).set(1.0);
                self.started_tests_at
                    .with_label_values(&labels)
                    .set(report.started_at as f64);
                self.ended_tests_at
                    .with_label_values(&labels)
                    .set(report.ended_at as f64);
                self.total_duration
                    .with_label_values(&labels)
                    .set(c.total_duration as f64);
                self.total_suites
                    .with_label_values(&labels)
                    .set(c.total_suites as f64);
                self.total_tests
                    .with_label_values(&labels)
                    .set(c.total_tests as f64);
                self.total_failed
                    .with_label_values(&labels)
                    .set(c.total_failed as f64);
                self.total_passed
                    .with_label_values(&labels)
                    .set(c.total_passed as f64);
                self.total_pending
                    .with_label_values(&labels)
                    .set(c.total_pending as f64);
                self.total_skipped
                    .with_label_values(&labels)
                    .set(c.total_skipped as f64);
                trace!(target_name = target, "recorded finished run");
            }
            RunOutcome::NotFinished { reason } => {
                self.result.with_label_values(&labels).set(0.0);
                for vec in self.resettable() {
                    vec.reset();
                }
                trace!(target_name = target, %reason, "recorded unfinished run; instruments reset");
            }
        }
    }

    /// Point-in-time copy of every non-empty metric family.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::new(self.registry.gather())
    }

    fn resettable(&self) -> [&GaugeVec; 9] {
        [
            &self.started_tests_at,
            &self.ended_tests_at,
            &self.total_duration,
            &self.total_suites,
            &self.total_tests,
            &self.total_failed,
            &self.total_passed,
            &self.total_pending,
            &self.total_skipped,
        ]
    }
}
