//! Prometheus metrics for the delay guard.
//!
//! All metrics follow the naming convention: `dg_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., transactions_queued_total)
//! - **Gauge**: Value that can go up or down (e.g., modules_enabled)

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, IntGauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // DELAY QUEUE METRICS (Component 1)
    // =========================================================================

    /// Guards created
    pub static ref GUARDS_CREATED: Counter = Counter::new(
        "dg_delay_guards_created_total",
        "Total number of delay guards set up"
    ).expect("metric creation failed");

    /// Transactions appended to a queue
    pub static ref TRANSACTIONS_QUEUED: Counter = Counter::new(
        "dg_delay_transactions_queued_total",
        "Total transactions queued by enabled modules"
    ).expect("metric creation failed");

    /// Transactions forwarded to the target
    pub static ref TRANSACTIONS_EXECUTED: Counter = Counter::new(
        "dg_delay_transactions_executed_total",
        "Total queued transactions executed after their cooldown"
    ).expect("metric creation failed");

    /// Transactions skipped past their deadline
    pub static ref TRANSACTIONS_EXPIRED: Counter = Counter::new(
        "dg_delay_transactions_expired_total",
        "Total queued transactions skipped after expiring"
    ).expect("metric creation failed");

    /// Rejected requests by reason
    pub static ref TRANSACTIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("dg_delay_transactions_rejected_total", "Rejected guard requests by reason"),
        &["reason"]  // reason: DelayError::kind()
    ).expect("metric creation failed");

    /// Modules currently enabled across guards
    pub static ref MODULES_ENABLED: IntGauge = IntGauge::new(
        "dg_delay_modules_enabled",
        "Number of modules currently enabled across all guards"
    ).expect("metric creation failed");

    /// Items waiting in queues
    pub static ref QUEUE_DEPTH: Gauge = Gauge::new(
        "dg_delay_queue_depth",
        "Queued transactions not yet executed or skipped"
    ).expect("metric creation failed");

    // =========================================================================
    // RECOVERY METRICS (Component 2)
    // =========================================================================

    /// Recovery requests queued
    pub static ref RECOVERY_REQUESTS: Counter = Counter::new(
        "dg_recovery_requests_total",
        "Total owner-swap recoveries queued"
    ).expect("metric creation failed");

    /// Recovery module ownership changes
    pub static ref OWNERSHIP_TRANSFERS: Counter = Counter::new(
        "dg_recovery_ownership_transfers_total",
        "Total recovery module ownership transfers"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice is harmless.
///
/// # Errors
/// `MetricsInit` when the registry refuses a collector.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Delay
        Box::new(GUARDS_CREATED.clone()),
        Box::new(TRANSACTIONS_QUEUED.clone()),
        Box::new(TRANSACTIONS_EXECUTED.clone()),
        Box::new(TRANSACTIONS_EXPIRED.clone()),
        Box::new(TRANSACTIONS_REJECTED.clone()),
        Box::new(MODULES_ENABLED.clone()),
        Box::new(QUEUE_DEPTH.clone()),
        // Recovery
        Box::new(RECOVERY_REQUESTS.clone()),
        Box::new(OWNERSHIP_TRANSFERS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Count a rejected request under `reason`.
pub fn record_rejection(reason: &str) {
    TRANSACTIONS_REJECTED.with_label_values(&[reason]).inc();
}

/// Encode all metrics as Prometheus text format.
///
/// # Errors
/// `MetricsInit` when encoding fails.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
