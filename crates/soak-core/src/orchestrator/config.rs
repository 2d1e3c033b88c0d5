use std::{num::NonZeroU64, time::Duration};

/// How many times each target is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterLimit {
    Bounded(NonZeroU64),
    /// Run forever; the process is expected to be stopped from outside.
    #[default]
    Unlimited,
}

impl IterLimit {
    /// `0` means unlimited.
    pub fn from_count(count: u64) -> Self {
        match NonZeroU64::new(count) {
            Some(n) => IterLimit::Bounded(n),
            None => IterLimit::Unlimited,
        }
    }

    /// Whether iteration number `iteration` (1-based) may run.
    pub fn allows(&self, iteration: u64) -> bool {
        match self {
            IterLimit::Bounded(n) => iteration <= n.get(),
            IterLimit::Unlimited => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    pub iter_limit: IterLimit,
    /// Pause between consecutive runs; zero means no suspension.
    pub delay: Duration,
}

impl OrchestratorConfig {
    pub fn new(iter_limit: IterLimit, delay: Duration) -> Self {
        Self { iter_limit, delay }
    }
}
