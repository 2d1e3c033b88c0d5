use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::OffsetTime},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::{
    config::LoggerConfig, error::LoggerError, filter::build_filter, format::LoggerFormat,
};

type Filtered = Layered<EnvFilter, Registry>;

/// Install the global `tracing` subscriber described by `cfg`.
///
/// Succeeds once per process; later calls fail with [`LoggerError::AlreadyInitialized`].
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let registry = tracing_subscriber::registry().with(build_filter(cfg)?);

    let installed = match cfg.format {
        LoggerFormat::Text => registry
            .with(fmt::layer().with_ansi(cfg.use_color).with_timer(timer()))
            .try_init(),
        LoggerFormat::Json => registry
            .with(fmt::layer().json().with_timer(timer()))
            .try_init(),
        LoggerFormat::Journald => return journald(registry),
    };
    installed.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}

// Local offset lookup fails once other threads exist; fall back to UTC.
fn timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald(registry: Filtered) -> Result<(), LoggerError> {
    let layer = tracing_journald::layer().map_err(|e| LoggerError::Journald(e.to_string()))?;
    registry
        .with(layer)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald(_registry: Filtered) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
