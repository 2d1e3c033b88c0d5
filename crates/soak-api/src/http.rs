use axum::{
    Router,
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};
use soak_prometheus::MetricsModel;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ApiError;

/// Pull endpoint over the metrics model.
pub struct MetricsApi {
    metrics: MetricsModel,
}

impl MetricsApi {
    pub fn new(metrics: MetricsModel) -> Self {
        Self { metrics }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /metrics - Prometheus text exposition
    pub fn router(self) -> Router {
        Router::new()
            .route("/metrics", get(metrics))
            .with_state(self.metrics)
    }
}

/// Serve `api` on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    api: MetricsApi,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, port = addr.port(), "server is listening, metrics are exposed on /metrics endpoint");
    axum::serve(listener, api.router())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!("metrics server stopped");
    Ok(())
}

/// GET /metrics
async fn metrics(State(model): State<MetricsModel>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = model.snapshot();
    let body = snapshot.encode()?;
    debug!(families = snapshot.families().len(), "metrics scraped");
    Ok(([(CONTENT_TYPE, snapshot.content_type())], body))
}
