use async_trait::async_trait;
use soak_model::RunNumber;
use soak_prometheus::MetricsSnapshot;

use crate::error::PublishError;

/// Best-effort sink for metric snapshots.
///
/// Called once after every run. The caller logs and otherwise ignores errors.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, snapshot: &MetricsSnapshot, run: RunNumber) -> Result<(), PublishError>;
}
