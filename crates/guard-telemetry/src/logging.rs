//! Structured logging.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] built from
//! the configured level and either a human-readable or a JSON fmt layer.
//! Logs go to stderr so command output on stdout stays machine-readable. JSON
//! lines carry `timestamp`, `level`, `target`, `fields` and the active spans,
//! so the guard and module addresses recorded by `#[instrument]` travel with
//! every entry.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Builds the filter for `config`.
///
/// # Errors
/// `LoggingInit` when the level is not a valid filter directive.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Install the global subscriber.
///
/// # Errors
/// `LoggingInit` for an invalid level or when a subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    if !config.console_output {
        return tracing_subscriber::registry()
            .with(filter)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()));
    }

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(
        service = %config.service_name,
        level = %config.log_level,
        json_logs = config.json_logs,
        "Logging initialised"
    );
    Ok(())
}

/// Log a guard-related event with standard fields.
#[macro_export]
macro_rules! log_guard_event {
    ($level:ident, $guard:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            guard = %$guard,
            $($($field)*,)?
            $msg
        )
    };
}
