use tracing_subscriber::{EnvFilter, filter::Directive};

use crate::{config::LoggerConfig, error::LoggerError, targets::RUNNER_OUTPUT};

/// Daemon directives from `level`, plus an override for runner output when one is set.
///
/// The override is appended last so it wins over a broader directive in `level`.
pub(crate) fn build_filter(cfg: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let filter = EnvFilter::try_new(&cfg.level).map_err(|e| LoggerError::InvalidFilter {
        directive: cfg.level.clone(),
        reason: e.to_string(),
    })?;

    let Some(level) = &cfg.runner_output else {
        return Ok(filter);
    };
    let directive = format!("{RUNNER_OUTPUT}={}", level.trim());
    let parsed = directive
        .parse::<Directive>()
        .map_err(|e| LoggerError::InvalidFilter {
            directive: directive.clone(),
            reason: e.to_string(),
        })?;
    Ok(filter.add_directive(parsed))
}
