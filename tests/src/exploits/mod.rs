//! # Exploit Simulations
//!
//! Attempts to get a call through the guard without waiting, or without
//! being allowed to.

pub mod authorization;
pub mod reentrancy;
