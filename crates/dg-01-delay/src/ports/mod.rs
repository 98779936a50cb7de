//! Ports layer for the delay component.
//!
//! - Inbound (Driving) port: `DelayApi`, used by modules and the avatar
//! - Outbound (Driven) ports: `TimeSource`, `ExecutionSink`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
