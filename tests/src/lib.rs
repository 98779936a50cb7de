//! # Delay Guard Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared wiring: clock, wallet, bus, guard
//! │
//! ├── integration/      # Cross-component flows
//! │   ├── queue_properties.rs   # Cursor, bypass, cooldown and expiration boundaries
//! │   ├── recovery_flow.rs      # Swap-owner module through the delay queue
//! │   └── runtime_wiring.rs     # Container, planner and metrics together
//! │
//! └── exploits/         # Attack simulations
//!     ├── authorization.rs      # Callers that must be refused
//!     └── reentrancy.rs         # Calls back into the guard mid-execution
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p dg-tests
//!
//! # By category
//! cargo test -p dg-tests integration::
//! cargo test -p dg-tests exploits::
//! ```

#![allow(dead_code)]

pub mod exploits;
pub mod fixtures;
pub mod integration;
