mod error;
pub use error::ReportError;

pub mod report;
pub use report::parse_report;

pub mod proc;
pub use proc::{ProcConfig, ProcRunner, ScopeMode};
