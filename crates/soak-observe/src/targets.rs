//! `tracing` targets shared by the crates that emit and filter runner logs.

/// Runner lifecycle: spawn, exit code, reaping.
pub const RUNNER: &str = "soak.exec.proc";

/// One event per stdout line of the runner process.
pub const RUNNER_OUTPUT: &str = "soak.exec.proc.out";
