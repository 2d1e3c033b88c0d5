pub mod error;
pub use error::{OrchestratorError, PublishError, RunnerError};

pub mod runner;
pub use runner::TestRunner;

pub mod publish;
pub use publish::Publisher;

pub mod orchestrator;
pub use orchestrator::{IterLimit, Orchestrator, OrchestratorConfig, RunSummary};
