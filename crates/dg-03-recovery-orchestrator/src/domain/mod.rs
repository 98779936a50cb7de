//! # Domain Layer - Recovery Orchestrator
//!
//! - `calls`: builders for every wallet call the recovery flow needs
//! - `entities`: DeploymentConfig, Proposal, SetupPlan, RecoveryPlan
//! - `errors`: OrchestratorError enumeration

pub mod calls;
pub mod entities;
pub mod errors;

pub use calls::*;
pub use entities::*;
pub use errors::*;
