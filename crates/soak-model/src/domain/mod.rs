mod constants;
pub use constants::{ANONYMOUS_TARGET, DEFAULT_TARGET_LABEL};

mod target;
pub use target::Target;

mod run_status;
pub use run_status::RunStatus;

mod run_counts;
pub use run_counts::RunCounts;

mod run_outcome;
pub use run_outcome::{RunOutcome, RunReport};

/// Epoch timestamp in milliseconds.
pub type EpochMs = i64;

/// Sequential number of a runner invocation across the whole process (starts at 1).
pub type RunNumber = u64;
