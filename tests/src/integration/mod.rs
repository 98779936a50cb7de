//! # Integration Tests
//!
//! Flows that cross component boundaries.

pub mod queue_properties;
pub mod recovery_flow;
pub mod runtime_wiring;
