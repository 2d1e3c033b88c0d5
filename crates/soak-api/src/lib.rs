mod error;
pub use error::ApiError;

mod http;
pub use http::{MetricsApi, serve};

pub use axum;
