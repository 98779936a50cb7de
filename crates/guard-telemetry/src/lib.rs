//! # Guard Telemetry
//!
//! Logging and metrics for the delay guard workspace.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry, pretty or JSON
//! - **Metrics**: Prometheus counters and gauges in a process-wide registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guard_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Spans and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DG_SERVICE_NAME` | `delay-guard` | Service name in logs |
//! | `DG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `DG_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `DG_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |

#![warn(clippy::all)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{
    encode_metrics, record_rejection, register_metrics, GUARDS_CREATED, MODULES_ENABLED,
    OWNERSHIP_TRANSFERS, QUEUE_DEPTH, RECOVERY_REQUESTS, REGISTRY, TRANSACTIONS_EXECUTED,
    TRANSACTIONS_EXPIRED, TRANSACTIONS_QUEUED, TRANSACTIONS_REJECTED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics, then install logging.
///
/// # Errors
/// Whatever [`register_metrics`] or [`init_logging`] reports.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
