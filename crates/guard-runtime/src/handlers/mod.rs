//! # Event Handlers
//!
//! Bus subscribers run by the runtime.

pub mod metrics;

pub use metrics::MetricsHandler;
