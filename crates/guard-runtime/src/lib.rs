//! # Guard Runtime Library
//!
//! This library exposes the internal modules of the guard runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: components expose inbound APIs and depend on
//!   outbound ports; this crate supplies the adapters
//! - **Event-Driven Observability**: metrics move only through bus events

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod container;
pub mod handlers;
pub mod simulation;

pub use container::{ConfigError, ContainerError, GuardContainer, RuntimeConfig};
pub use handlers::MetricsHandler;
pub use simulation::{run_simulation, SimulationParams, SimulationReport, SimulationStep, StepResult};
