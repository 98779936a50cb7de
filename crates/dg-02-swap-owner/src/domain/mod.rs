//! # Domain Layer - Swap-Owner Recovery Module
//!
//! - `entities`: ModuleSetup, RecoveryRequest (swapOwner encoding)
//! - `pending`: one-live-request rule
//! - `errors`: SwapOwnerError enumeration

pub mod entities;
pub mod errors;
pub mod pending;

pub use entities::*;
pub use errors::*;
pub use pending::*;
