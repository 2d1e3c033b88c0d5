use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("constant label `{0}` collides with the target label")]
    LabelCollision(String),

    #[error("encoded metrics are not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
