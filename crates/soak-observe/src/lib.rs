//! Log output for `soakd`.
//!
//! The daemon logs its own events and, under [`targets::RUNNER_OUTPUT`], every stdout line of the
//! test runner. The two are filtered independently so runner chatter can be muted or surfaced
//! without touching the daemon's level.

mod config;
mod error;
mod filter;
mod format;
mod init;
pub mod targets;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use init::logger_init;
