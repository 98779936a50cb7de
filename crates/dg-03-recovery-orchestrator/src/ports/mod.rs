//! Ports layer for the recovery orchestrator.

pub mod outbound;

pub use outbound::*;
