//! Runner report contract.
//!
//! The runner prints a JSON object on stdout, e.g.
//! `{"status":"finished","startedTestsAt":"2024-05-01T10:00:00.000Z",...,"totalSkipped":0}`.
//! Other stdout lines are allowed, JSON log lines included; the report is the last line that
//! parses as a JSON object with a string `status`.

use serde::Deserialize;
use soak_model::{EpochMs, RunCounts, RunOutcome};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::error::ReportError;

const FINISHED: &str = "finished";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    status: String,
    started_tests_at: Option<String>,
    ended_tests_at: Option<String>,
    total_duration: Option<u64>,
    total_suites: Option<u64>,
    total_tests: Option<u64>,
    total_failed: Option<u64>,
    total_passed: Option<u64>,
    total_pending: Option<u64>,
    total_skipped: Option<u64>,
}

/// Find the report among `stdout` lines and convert it.
pub fn parse_report(stdout: &str) -> Result<RunOutcome, ReportError> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with('{') && is_report(l))
        .ok_or(ReportError::Missing)?;

    let raw: RawReport = serde_json::from_str(line)?;
    raw.into_outcome()
}

fn is_report(line: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(line)
        .is_ok_and(|v| v.get("status").is_some_and(serde_json::Value::is_string))
}

impl RawReport {
    fn into_outcome(self) -> Result<RunOutcome, ReportError> {
        if self.status != FINISHED {
            return Ok(RunOutcome::not_finished(self.status));
        }
        let started_at = epoch_ms("startedTestsAt", self.started_tests_at)?;
        let ended_at = epoch_ms("endedTestsAt", self.ended_tests_at)?;
        let counts = RunCounts {
            total_duration: require("totalDuration", self.total_duration)?,
            total_suites: require("totalSuites", self.total_suites)?,
            total_tests: require("totalTests", self.total_tests)?,
            total_failed: require("totalFailed", self.total_failed)?,
            total_passed: require("totalPassed", self.total_passed)?,
            total_pending: require("totalPending", self.total_pending)?,
            total_skipped: require("totalSkipped", self.total_skipped)?,
        };
        Ok(RunOutcome::finished(started_at, ended_at, counts))
    }
}

fn require<T>(field: &'static str, value: Option<T>) -> Result<T, ReportError> {
    value.ok_or(ReportError::MissingField(field))
}

fn epoch_ms(field: &'static str, value: Option<String>) -> Result<EpochMs, ReportError> {
    let value = require(field, value)?;
    let ts = OffsetDateTime::parse(&value, &Rfc3339)
        .map_err(|_| ReportError::Timestamp { field, value })?;
    Ok((ts.unix_timestamp_nanos() / 1_000_000) as EpochMs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soak_model::RunStatus;

    const FINISHED_REPORT: &str = r#"{"status":"finished","startedTestsAt":"2021-03-02T10:00:00.123Z","endedTestsAt":"2021-03-02T10:00:05.523Z","totalDuration":5400,"totalSuites":2,"totalTests":10,"totalFailed":1,"totalPassed":7,"totalPending":1,"totalSkipped":1,"runs":[]}"#;

    #[test]
    fn finished_report_is_converted() {
        let outcome = parse_report(FINISHED_REPORT).unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.started_at, 1_614_679_200_123);
        assert_eq!(report.ended_at, 1_614_679_205_523);
        assert_eq!(
            report.counts,
            RunCounts {
                total_duration: 5400,
                total_suites: 2,
                total_tests: 10,
                total_failed: 1,
                total_passed: 7,
                total_pending: 1,
                total_skipped: 1,
            }
        );
    }

    #[test]
    fn last_json_line_wins_over_log_noise() {
        let stdout = format!(
            "starting browser\n{{\"status\":\"failed\"}}\n  Running: login.spec.js\n{FINISHED_REPORT}\nbye\n"
        );
        let outcome = parse_report(&stdout).unwrap();
        assert_eq!(outcome.status(), RunStatus::Finished);
    }

    #[test]
    fn trailing_json_log_line_is_not_the_report() {
        let stdout = format!(
            "{FINISHED_REPORT}\n{{\"level\":\"info\",\"msg\":\"uploading video\"}}\n{{\"status\":3}}\n"
        );
        let outcome = parse_report(&stdout).unwrap();
        assert_eq!(outcome.report().unwrap().counts.total_tests, 10);
    }

    #[test]
    fn other_status_is_not_finished() {
        let outcome = parse_report(r#"{"status":"failed","failures":1,"message":"boom"}"#).unwrap();
        assert_eq!(outcome, RunOutcome::not_finished("failed"));
    }

    #[test]
    fn missing_report_is_an_error() {
        let err = parse_report("just some logs\n[1, 2]\n{\"event\":\"exit\"}\n").unwrap_err();
        assert!(matches!(err, ReportError::Missing));
    }

    #[test]
    fn finished_report_requires_counts() {
        let err = parse_report(
            r#"{"status":"finished","startedTestsAt":"2021-03-02T10:00:00Z","endedTestsAt":"2021-03-02T10:00:01Z"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::MissingField("totalDuration")));
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let err = parse_report(&FINISHED_REPORT.replace("2021-03-02T10:00:00.123Z", "yesterday"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Timestamp { field: "startedTestsAt", .. }));
    }
}
