//! Prometheus-backed metrics model for test runs.
//!
//! [`MetricsModel`] owns a dedicated [`prometheus::Registry`] holding one gauge family per instrument,
//! each labelled by target name. It is cheap to clone; clones share the same series.
//!
//! ## Example
//! ```rust
//! use soak_model::{RunCounts, RunOutcome};
//! use soak_prometheus::{MetricsConfig, MetricsModel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = MetricsModel::new(&MetricsConfig::default())?;
//! metrics.record_outcome("login", &RunOutcome::finished(1_000, 2_000, RunCounts::default()));
//!
//! let body = metrics.snapshot().encode()?;
//! assert!(body.contains(r#"result{test_name="login"} 1"#));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `result{test_name}` - 1 if the last run finished, 0 otherwise
//! - `startedTestsAt{test_name}`, `endedTestsAt{test_name}` - epoch ms of the last finished run
//! - `totalDuration`, `totalSuites`, `totalTests`, `totalFailed`, `totalPassed`, `totalPending`, `totalSkipped`
//!
//! Everything except `result` is wiped for all targets whenever any run does not finish.
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; see `soak-api`.

mod backend;
pub use backend::{MetricsConfig, MetricsModel};

mod error;
pub use error::MetricsError;

mod snapshot;
pub use snapshot::MetricsSnapshot;

pub use prometheus::{Encoder, Error as PrometheusError, Registry, TEXT_FORMAT, TextEncoder};
