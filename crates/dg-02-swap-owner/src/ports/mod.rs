//! Ports layer for the recovery module.
//!
//! - Inbound (Driving) port: `SwapOwnerApi`
//! - Outbound (Driven) port: `DelayQueuePort`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
