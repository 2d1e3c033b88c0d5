use async_trait::async_trait;
use reqwest::{Client, Url, header::CONTENT_TYPE};
use soak_core::{PublishError, Publisher};
use soak_model::RunNumber;
use soak_prometheus::MetricsSnapshot;
use tracing::{debug, info, warn};

use crate::config::GatewayConfig;

/// Publisher pushing snapshots to a Prometheus push gateway.
///
/// Without a config every push is a no-op.
pub struct Gateway {
    cfg: Option<GatewayConfig>,
    client: Client,
}

impl Gateway {
    pub fn new(cfg: Option<GatewayConfig>) -> Result<Self, PublishError> {
        let timeout = cfg.as_ref().map(|c| c.timeout).unwrap_or_default();
        let mut builder = Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        if let Some(cfg) = &cfg {
            endpoint(cfg, 0)?;
            info!(url = %cfg.url, job = %cfg.job, "push gateway enabled");
        }
        Ok(Self { cfg, client })
    }

    pub fn is_enabled(&self) -> bool {
        self.cfg.is_some()
    }

    /// Send `snapshot` as job `<job><run>`.
    ///
    /// Failures are logged here and returned; callers are free to ignore them.
    pub async fn push(&self, snapshot: &MetricsSnapshot, run: RunNumber) -> Result<(), PublishError> {
        let Some(cfg) = &self.cfg else {
            return Ok(());
        };
        let res = self.send(cfg, snapshot, run).await;
        if let Err(e) = &res {
            match e {
                PublishError::Rejected { status, .. } => {
                    warn!(job = %cfg.job_for(run), code = status, error = %e, "push gateway rejected metrics")
                }
                _ => warn!(job = %cfg.job_for(run), error = %e, "push gateway error"),
            }
        }
        res
    }

    async fn send(
        &self,
        cfg: &GatewayConfig,
        snapshot: &MetricsSnapshot,
        run: RunNumber,
    ) -> Result<(), PublishError> {
        let url = endpoint(cfg, run)?;
        let body = snapshot.encode()?;
        debug!(%url, "sending metrics to push gateway");

        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, snapshot.content_type())
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        info!(job = %cfg.job_for(run), code = status.as_u16(), "push gateway response");
        Ok(())
    }
}

#[async_trait]
impl Publisher for Gateway {
    async fn publish(&self, snapshot: &MetricsSnapshot, run: RunNumber) -> Result<(), PublishError> {
        self.push(snapshot, run).await
    }
}

/// `<url>/metrics/job/<job><run>`, with the job percent-encoded as one path segment.
fn endpoint(cfg: &GatewayConfig, run: RunNumber) -> Result<Url, PublishError> {
    let mut url =
        Url::parse(&cfg.url).map_err(|e| PublishError::InvalidUrl(format!("{}: {e}", cfg.url)))?;
    url.path_segments_mut()
        .map_err(|_| PublishError::InvalidUrl(format!("{}: cannot be a base", cfg.url)))?
        .pop_if_empty()
        .extend(["metrics", "job", cfg.job_for(run).as_str()]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::put,
    };
    use soak_model::{RunCounts, RunOutcome};
    use soak_prometheus::{MetricsConfig, MetricsModel};

    #[derive(Clone, Default)]
    struct Captured {
        pushes: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    async fn accept(
        State(c): State<Captured>,
        Path(job): Path<String>,
        headers: HeaderMap,
        body: String,
    ) -> StatusCode {
        let ct = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        c.pushes.lock().unwrap().push((job, ct, body));
        StatusCode::OK
    }

    async fn spawn_gateway(status: StatusCode) -> (String, Captured) {
        let captured = Captured::default();
        let app = if status.is_success() {
            Router::new()
                .route("/metrics/job/{job}", put(accept))
                .with_state(captured.clone())
        } else {
            Router::new().route("/metrics/job/{job}", put(move || async move { status }))
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn snapshot() -> MetricsSnapshot {
        let model = MetricsModel::new(&MetricsConfig::default()).unwrap();
        model.record_outcome("login", &RunOutcome::finished(1, 2, RunCounts::default()));
        model.snapshot()
    }

    #[tokio::test]
    async fn pushes_use_distinct_job_per_run() {
        let (url, captured) = spawn_gateway(StatusCode::OK).await;
        let gw = Gateway::new(Some(GatewayConfig::new(url, "e2e"))).unwrap();
        let snap = snapshot();

        gw.push(&snap, 1).await.unwrap();
        gw.push(&snap, 2).await.unwrap();

        let pushes = captured.pushes.lock().unwrap();
        let jobs: Vec<_> = pushes.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(jobs, ["e2e1", "e2e2"]);
        assert!(pushes[0].1.starts_with("text/plain"));
        assert!(pushes[0].2.contains(r#"result{test_name="login"} 1"#));
    }

    #[tokio::test]
    async fn rejected_push_reports_status() {
        let (url, _) = spawn_gateway(StatusCode::INTERNAL_SERVER_ERROR).await;
        let gw = Gateway::new(Some(GatewayConfig::new(url, "e2e"))).unwrap();

        let err = gw.push(&snapshot(), 1).await.unwrap_err();
        assert!(matches!(err, PublishError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let gw = Gateway::new(Some(GatewayConfig::new(format!("http://{addr}"), "e2e"))).unwrap();

        let err = gw.publish(&snapshot(), 1).await.unwrap_err();
        assert!(matches!(err, PublishError::Transport(_)));
    }

    #[tokio::test]
    async fn disabled_gateway_is_a_no_op() {
        let gw = Gateway::new(None).unwrap();
        assert!(!gw.is_enabled());
        assert!(gw.push(&snapshot(), 1).await.is_ok());
    }

    #[test]
    fn endpoint_appends_job_path() {
        let cfg = GatewayConfig::new("http://gw:9091/", "nightly e2e");
        let url = endpoint(&cfg, 3).unwrap();
        assert_eq!(url.as_str(), "http://gw:9091/metrics/job/nightly%20e2e3");
    }

    #[test]
    fn invalid_url_is_rejected_up_front() {
        let err = Gateway::new(Some(GatewayConfig::new("not a url", "e2e"))).err();
        assert!(matches!(err, Some(PublishError::InvalidUrl(_))));
    }
}
