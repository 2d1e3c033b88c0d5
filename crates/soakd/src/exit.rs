use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Exit {
    /// Every target x iteration run completed.
    Success = 0,

    /// At least one runner invocation raised instead of reporting.
    RunnerFailed = 1,

    /// Invalid configuration, unreadable targets directory, or a startup failure.
    InvalidInput = 2,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}
