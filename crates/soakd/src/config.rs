use std::{net::IpAddr, path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use soak_core::{IterLimit, OrchestratorConfig};
use soak_discover::DiscoverConfig;
use soak_exec::{ProcConfig, ScopeMode};
use soak_gateway::GatewayConfig;
use soak_model::DEFAULT_TARGET_LABEL;
use soak_observe::{LoggerConfig, LoggerFormat};
use soak_prometheus::MetricsConfig;

/// Environment variable the runner reads its application base URL from.
const BASE_URL_ENV: &str = "CYPRESS_BASE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    /// Pass the target location as a runner argument.
    Arg,
    /// Run the runner inside the target directory.
    Cwd,
}

#[derive(Debug, Parser)]
#[command(
    name = "soakd",
    version,
    about = "Runs a test runner in a loop and exposes the results as Prometheus metrics",
    after_help = "Examples:\n  soakd --iter-limit 1 -- npx cypress run\n  TARGETS_DIR=cypress/e2e DELAY_TIMEOUT=60000 soakd -- ./run-cypress.sh"
)]
pub struct Config {
    /// HTTP port of the /metrics endpoint
    #[arg(long, env = "LISTEN_PORT", default_value_t = 8080)]
    pub listen_port: u16,

    /// Address the /metrics endpoint binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0")]
    pub listen_addr: IpAddr,

    /// Milliseconds to wait between runs
    #[arg(long, env = "DELAY_TIMEOUT", default_value_t = 0)]
    pub delay_ms: u64,

    /// Runs per target; 0 or unset runs forever
    #[arg(long, env = "ITER_LIMIT")]
    pub iter_limit: Option<u64>,

    /// Push gateway base URL; pushing is disabled when unset
    #[arg(long, env = "PUSH_GATEWAY_URL")]
    pub push_gateway_url: Option<String>,

    /// Job name prefix for pushes; the run number is appended
    #[arg(long, env = "PUSH_GATEWAY_JOB_NAME", default_value = "soak")]
    pub push_gateway_job_name: String,

    /// Name of a constant label added to every metric
    #[arg(long, env = "DEFAULT_LABEL_NAME")]
    pub default_label_name: Option<String>,

    /// Value of the constant label
    #[arg(long, env = "DEFAULT_LABEL_VALUE")]
    pub default_label_value: Option<String>,

    /// Directory whose entries are run as separate targets
    #[arg(long, env = "TARGETS_DIR")]
    pub targets_dir: Option<PathBuf>,

    /// Run only the entry of the targets directory with this exact file name
    #[arg(long = "target", env = "TARGET_NAME")]
    pub target_name: Option<String>,

    /// Label key of the per-target dimension
    #[arg(long = "target-label", env = "TARGET_LABEL_NAME", default_value = DEFAULT_TARGET_LABEL)]
    pub target_label: String,

    /// How a run is restricted to one target
    #[arg(long, env = "TARGET_SCOPE", value_enum, default_value_t = Scope::Arg)]
    pub scope: Scope,

    /// Runner flag followed by the target location in `arg` scope
    #[arg(long, env = "TARGET_SCOPE_FLAG", default_value = "--spec", allow_hyphen_values = true)]
    pub scope_flag: String,

    /// Base URL of the application under test, exported to the runner
    #[arg(long, env = BASE_URL_ENV, default_value = "http://localhost")]
    pub base_url: String,

    /// Extra KEY=VALUE environment for the runner
    #[arg(long = "runner-env", env = "RUNNER_ENV", value_delimiter = ',', value_parser = parse_key_val)]
    pub runner_env: Vec<(String, String)>,

    /// Log filter directive
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Level of runner stdout lines in the log; `off` hides them
    #[arg(long, env = "RUNNER_OUTPUT_LEVEL", default_value = "debug")]
    pub runner_output_level: String,

    /// Log output format: text, json or journald
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Runner command line, e.g. `-- npx cypress run --browser chrome`
    #[arg(last = true, required = true, value_name = "RUNNER")]
    pub command: Vec<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if k.trim().is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((k.trim().to_string(), v.to_string()))
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.command.first().is_none_or(|p| p.trim().is_empty()) {
            bail!("runner command is empty");
        }
        if self.default_label_name.is_some() != self.default_label_value.is_some() {
            bail!("DEFAULT_LABEL_NAME and DEFAULT_LABEL_VALUE must be set together");
        }
        if self.default_label_name.as_deref() == Some(self.target_label.as_str()) {
            bail!(
                "DEFAULT_LABEL_NAME `{}` collides with the target label",
                self.target_label
            );
        }
        if self.target_name.is_some() && self.targets_dir.is_none() {
            bail!("TARGET_NAME requires TARGETS_DIR");
        }
        if self.scope == Scope::Arg && self.scope_flag.trim().is_empty() {
            bail!("TARGET_SCOPE_FLAG cannot be empty in `arg` scope");
        }
        Ok(())
    }

    pub fn logger(&self) -> anyhow::Result<LoggerConfig> {
        let format: LoggerFormat = self.log_format.parse()?;
        Ok(LoggerConfig::new(format, self.log_level.clone())
            .with_runner_output(self.runner_output_level.clone()))
    }

    pub fn metrics(&self) -> MetricsConfig {
        let cfg = MetricsConfig::default().with_target_label(self.target_label.clone());
        match (&self.default_label_name, &self.default_label_value) {
            (Some(name), Some(value)) => cfg.with_default_label(name.clone(), value.clone()),
            _ => cfg,
        }
    }

    pub fn discover(&self) -> Option<DiscoverConfig> {
        let dir = self.targets_dir.as_ref()?;
        let cfg = DiscoverConfig::new(dir);
        Some(match &self.target_name {
            Some(name) => cfg.with_filter(name.clone()),
            None => cfg,
        })
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig::new(
            IterLimit::from_count(self.iter_limit.unwrap_or(0)),
            Duration::from_millis(self.delay_ms),
        )
    }

    pub fn gateway(&self) -> Option<GatewayConfig> {
        self.push_gateway_url
            .as_ref()
            .map(|url| GatewayConfig::new(url.clone(), self.push_gateway_job_name.clone()))
    }

    pub fn proc(&self) -> anyhow::Result<ProcConfig> {
        let (program, args) = self
            .command
            .split_first()
            .context("runner command is empty")?;
        let scope = match self.scope {
            Scope::Arg => ScopeMode::Arg(self.scope_flag.clone()),
            Scope::Cwd => ScopeMode::Cwd,
        };
        let mut cfg = ProcConfig::new(program.clone(), args.to_vec())
            .with_scope(scope)
            .with_env(BASE_URL_ENV, self.base_url.clone());
        for (k, v) in &self.runner_env {
            cfg = cfg.with_env(k.clone(), v.clone());
        }
        Ok(cfg)
    }
}
