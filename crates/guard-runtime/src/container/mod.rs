//! # Component Container
//!
//! Holds the delay queue, the recovery module and the planner for one wallet,
//! wired around a single event bus.

pub mod config;
pub mod services;

pub use config::{ConfigError, RuntimeConfig};
pub use services::{ContainerError, GuardContainer};
