use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway, e.g. `http://pushgateway:9091`.
    pub url: String,
    /// Job name prefix; the run number is appended.
    pub job: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(url: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            job: job.into(),
            timeout: Duration::from_millis(15_000),
        }
    }

    /// Job identity of run `run`.
    pub fn job_for(&self, run: u64) -> String {
        format!("{}{}", self.job, run)
    }
}
