use std::process::Stdio;

use async_trait::async_trait;
use soak_core::{RunnerError, TestRunner};
use soak_model::{RunOutcome, Target};
use soak_observe::targets::{RUNNER, RUNNER_OUTPUT};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::{Child, ChildStdout, Command},
};
use tracing::{debug, trace, warn};

use crate::report::parse_report;

/// How a runner invocation is restricted to one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeMode {
    /// Append `<flag> <location>` to the runner arguments (e.g. `--spec path`).
    Arg(String),
    /// Run the process with the target location as working directory.
    Cwd,
}

impl Default for ScopeMode {
    fn default() -> Self {
        ScopeMode::Arg("--spec".to_string())
    }
}

/// Process configuration, fixed for the runner instance.
#[derive(Clone, Debug, Default)]
pub struct ProcConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
    pub scope: ScopeMode,
}

impl ProcConfig {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            ..Default::default()
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_scope(mut self, scope: ScopeMode) -> Self {
        self.scope = scope;
        self
    }
}

/// Runs the test runner as a child process and reads its JSON report from stdout.
///
/// A non-zero exit code is not an error as long as a report was printed; runners exit
/// non-zero whenever tests fail.
pub struct ProcRunner {
    cfg: ProcConfig,
}

impl ProcRunner {
    pub fn new(cfg: ProcConfig) -> Self {
        Self { cfg }
    }

    /// Command line for `target`, scoped according to [`ScopeMode`].
    pub fn command(&self, target: &Target) -> Command {
        let mut cmd = Command::new(&self.cfg.program);
        cmd.args(&self.cfg.args);
        for (k, v) in &self.cfg.env {
            cmd.env(k, v);
        }

        if let Some(location) = target.location() {
            match &self.cfg.scope {
                ScopeMode::Arg(flag) => {
                    cmd.arg(flag).arg(location);
                }
                ScopeMode::Cwd => {
                    cmd.current_dir(location);
                }
            }
        }
        cmd
    }
}

#[async_trait]
impl TestRunner for ProcRunner {
    fn name(&self) -> &str {
        &self.cfg.program
    }

    async fn run(&self, target: &Target) -> Result<RunOutcome, RunnerError> {
        if self.cfg.program.is_empty() {
            return Err(RunnerError::Spawn("program is empty".into()));
        }

        let mut cmd = self.command(target);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::inherit());
        cmd.kill_on_drop(true);
        trace!(target: RUNNER, program = %self.cfg.program, target_name = target.name(), "spawn");

        let mut child = cmd
            .spawn()
            .map_err(|e| RunnerError::Spawn(format!("{}: {e}", self.cfg.program)))?;

        let Some(stdout) = child.stdout.take() else {
            reap(&mut child).await;
            return Err(RunnerError::Io("child stdout not captured".into()));
        };
        let captured = match read_output(stdout).await {
            Ok(captured) => captured,
            Err(e) => {
                reap(&mut child).await;
                return Err(e.into());
            }
        };

        let status = child.wait().await?;
        let code = status.code();
        if code.is_none() {
            return Err(RunnerError::KilledBySignal);
        }
        debug!(target: RUNNER, ?code, "runner exited");

        match parse_report(&captured) {
            Ok(outcome) => Ok(outcome),
            Err(crate::ReportError::Missing) => Err(RunnerError::MissingReport { code }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Collect stdout line by line until EOF, logging each line.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read.
async fn read_output(stdout: ChildStdout) -> std::io::Result<String> {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    let mut captured = String::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        debug!(target: RUNNER_OUTPUT, %line);
        captured.push_str(line);
        captured.push('\n');
    }
    Ok(captured)
}

/// Kill and wait for a child whose output could not be consumed.
async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(target: RUNNER, error = %e, "failed to stop runner");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use soak_model::RunStatus;

    const REPORT: &str = r#"{"status":"finished","startedTestsAt":"2021-03-02T10:00:00Z","endedTestsAt":"2021-03-02T10:00:02Z","totalDuration":2000,"totalSuites":1,"totalTests":2,"totalFailed":1,"totalPassed":1,"totalPending":0,"totalSkipped":0}"#;

    fn sh(script: &str) -> ProcRunner {
        ProcRunner::new(ProcConfig::new("sh", vec!["-c".into(), script.into(), "sh".into()]))
    }

    #[tokio::test]
    async fn reads_report_despite_non_zero_exit() {
        let runner = sh(&format!("echo 'Running tests'; echo '{REPORT}'; exit 1"));
        let outcome = runner.run(&Target::anonymous()).await.unwrap();

        assert_eq!(outcome.status(), RunStatus::Finished);
        assert_eq!(outcome.report().unwrap().counts.total_failed, 1);
    }

    #[tokio::test]
    async fn invalid_utf8_output_does_not_lose_the_report() {
        let tmp = tempfile::tempdir().unwrap();
        let marker = tmp.path().join("done");
        let runner = sh(&format!(
            "printf 'browser \\377 noise\\n'; sleep 0.2; touch '{}'; echo '{REPORT}'",
            marker.display()
        ));

        let outcome = runner.run(&Target::anonymous()).await.unwrap();

        assert_eq!(outcome.status(), RunStatus::Finished);
        assert!(marker.exists(), "runner must be complete when run() returns");
    }

    #[tokio::test]
    async fn reap_stops_a_running_child() {
        let mut child = Command::new("sh")
            .args(["-c", "sleep 30"])
            .kill_on_drop(true)
            .spawn()
            .unwrap();

        reap(&mut child).await;

        assert!(child.try_wait().unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_report_is_an_execution_error() {
        let runner = sh("echo 'crashed before reporting'; exit 3");
        let err = runner.run(&Target::anonymous()).await.unwrap_err();
        assert!(matches!(err, RunnerError::MissingReport { code: Some(3) }));
    }

    #[tokio::test]
    async fn unknown_program_fails_to_spawn() {
        let runner = ProcRunner::new(ProcConfig::new("/definitely/not/a/runner", vec![]));
        let err = runner.run(&Target::anonymous()).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn(_)));
    }

    #[tokio::test]
    async fn killed_runner_is_reported() {
        let runner = sh("kill -9 $$");
        let err = runner.run(&Target::anonymous()).await.unwrap_err();
        assert!(matches!(err, RunnerError::KilledBySignal));
    }

    #[tokio::test]
    async fn arg_scope_appends_flag_and_location() {
        // `$1 $2` are the injected `--spec <location>` pair
        let script = r#"printf '{"status":"%s"}\n' "$1=$2""#;
        let runner = sh(script);
        let target = Target::new("login", "/specs/login.spec.js");

        let outcome = runner.run(&target).await.unwrap();
        assert_eq!(
            outcome,
            RunOutcome::not_finished("--spec=/specs/login.spec.js")
        );
    }

    #[tokio::test]
    async fn cwd_scope_changes_working_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().canonicalize().unwrap();
        let runner = ProcRunner::new(
            ProcConfig::new("sh", vec!["-c".into(), r#"printf '{"status":"%s"}\n' "$(pwd -P)""#.into()])
                .with_scope(ScopeMode::Cwd),
        );
        let target = Target::new("suite", &dir);

        let outcome = runner.run(&target).await.unwrap();
        assert_eq!(outcome, RunOutcome::not_finished(dir.to_string_lossy()));
    }

    #[tokio::test]
    async fn extra_env_is_exported() {
        let runner = ProcRunner::new(
            ProcConfig::new("sh", vec!["-c".into(), r#"printf '{"status":"%s"}\n' "$CYPRESS_BASE_URL""#.into()])
                .with_env("CYPRESS_BASE_URL", "http://app:3000"),
        );
        let outcome = runner.run(&Target::anonymous()).await.unwrap();
        assert_eq!(outcome, RunOutcome::not_finished("http://app:3000"));
    }

    #[test]
    fn anonymous_target_is_not_scoped() {
        let runner = ProcRunner::new(ProcConfig::new("cypress", vec!["run".into()]));
        let cmd = runner.command(&Target::anonymous());
        let args: Vec<_> = cmd.as_std().get_args().collect();
        assert_eq!(args, ["run"]);
    }
}
