use prometheus::{Encoder, TEXT_FORMAT, TextEncoder, proto::MetricFamily};

use crate::error::MetricsError;

/// Gathered metric families, ready for exposition or push.
///
/// Holds copies; later writes to the model do not affect it.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    families: Vec<MetricFamily>,
}

impl MetricsSnapshot {
    pub(crate) fn new(families: Vec<MetricFamily>) -> Self {
        Self { families }
    }

    pub fn families(&self) -> &[MetricFamily] {
        &self.families
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Content type of [`MetricsSnapshot::encode`] output.
    pub fn content_type(&self) -> &'static str {
        TEXT_FORMAT
    }

    /// Render in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.families, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
