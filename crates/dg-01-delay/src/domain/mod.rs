//! # Domain Layer - Delay Guard
//!
//! Pure state machine: no clocks, no locks, no I/O. Time is passed in,
//! side effects are returned to the service.
//!
//! ## Components
//!
//! - `entities`: DelayConfig, GuardSetup, QueuedTransaction, SlotState
//! - `queue`: TransactionQueue with the execution cursor
//! - `registry`: ModuleRegistry membership set
//! - `guard`: DelayGuard aggregate with caller checks
//! - `errors`: DelayError enumeration

pub mod entities;
pub mod errors;
pub mod guard;
pub mod queue;
pub mod registry;

pub use entities::*;
pub use errors::*;
pub use guard::*;
pub use queue::*;
pub use registry::*;
