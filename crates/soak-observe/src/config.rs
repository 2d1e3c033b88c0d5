use std::io::IsTerminal;

use crate::format::LoggerFormat;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directives for the daemon, e.g. `info` or `soak_core=debug,info`.
    pub level: String,
    /// Level for runner stdout lines; `None` leaves them to `level`.
    pub runner_output: Option<String>,
    pub use_color: bool,
}

impl LoggerConfig {
    pub fn new(format: LoggerFormat, level: impl Into<String>) -> Self {
        Self {
            format,
            level: level.into(),
            runner_output: None,
            use_color: std::io::stdout().is_terminal(),
        }
    }

    pub fn with_runner_output(mut self, level: impl Into<String>) -> Self {
        self.runner_output = Some(level.into());
        self
    }
}
