use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use soak_api::MetricsApi;
use soak_core::{Orchestrator, OrchestratorError};
use soak_exec::ProcRunner;
use soak_gateway::Gateway;
use soak_observe::logger_init;
use soak_prometheus::MetricsModel;

mod config;
use config::Config;

mod exit;
use exit::Exit;

// Single cooperative thread: the run loop and the metrics endpoint interleave at await points.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cfg = Config::parse();

    // 1) Logger
    let logger = match cfg.logger() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("invalid logger configuration: {e:#}");
            return Exit::InvalidInput.into();
        }
    };
    if let Err(e) = logger_init(&logger) {
        eprintln!("failed to initialize logger: {e}");
        return Exit::InvalidInput.into();
    }

    match run(cfg).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!("{e:#}");
            Exit::InvalidInput.into()
        }
    }
}

async fn run(cfg: Config) -> anyhow::Result<Exit> {
    cfg.validate()?;
    info!(argv = ?std::env::args().collect::<Vec<_>>(), "command line arguments");
    let proc = cfg.proc()?;
    info!(program = %proc.program, args = ?proc.args, scope = ?proc.scope, "runner arguments");

    // 2) Metrics + targets
    let metrics = MetricsModel::new(&cfg.metrics())?;
    let targets = soak_discover::resolve(cfg.discover().as_ref())?;

    // 3) Exposition endpoint
    let shutdown = CancellationToken::new();
    let addr = SocketAddr::new(cfg.listen_addr, cfg.listen_port);
    let listener = TcpListener::bind(addr).await?;
    let server = tokio::spawn(soak_api::serve(
        listener,
        MetricsApi::new(metrics.clone()),
        shutdown.clone(),
    ));

    // 4) Run loop
    let gateway = Gateway::new(cfg.gateway())?;
    let orchestrator = Orchestrator::new(
        targets,
        Arc::new(ProcRunner::new(proc)),
        Arc::new(gateway),
        metrics,
        cfg.orchestrator(),
    )
    .with_shutdown(shutdown.clone());
    let result = orchestrator.run().await;

    shutdown.cancel();
    match server.await {
        Ok(Err(e)) => error!(error = %e, "metrics server failed"),
        Err(e) => error!(error = %e, "metrics server task panicked"),
        Ok(Ok(())) => {}
    }

    match result {
        Ok(summary) => {
            info!(runs = summary.runs, unfinished = summary.unfinished, "exiting");
            Ok(Exit::Success)
        }
        Err(e @ OrchestratorError::Runner { .. }) => {
            error!(error = %e, "test runner failed");
            Ok(Exit::RunnerFailed)
        }
    }
}
