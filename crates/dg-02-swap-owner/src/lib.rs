//! # DG-02 Swap-Owner - Owner-Gated Recovery Module
//!
//! **Component ID:** 2
//! **Status:** Core
//!
//! ## Purpose
//!
//! Lets a single recovery owner request "replace owner X with owner Y" on a
//! protected wallet. The request is never executed directly: it is encoded as
//! a `swapOwner(prev, old, new)` call and queued in the wallet's delay guard,
//! where the cooldown gives the wallet's current owners time to react.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Only the module owner starts recoveries | `service.rs` - `ensure_owner()` |
//! | INVARIANT-2 | Module must be enabled on its guard | `dg-01-delay` registry, lifted to `ModuleNotEnabled` |
//! | INVARIANT-3 | At most one live request per module | `domain/pending.rs` - `ensure_no_pending()` |
//! | INVARIANT-4 | Construction fails closed on null identities | `domain/entities.rs` - `ModuleSetup::validate()` |
//!
//! ## Request Flow
//!
//! ```text
//! owner ──start_recovery──→ SwapOwnerModule ──enqueue──→ delay guard
//!                                                            │
//!                               avatar ──execute (after cooldown)──→ swapOwner
//! ```
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `DelayQueuePort` | Enqueue into the guard, read back own slot state |
//! | `EventPublisher` | `SwapOwnerSetup`, `RecoveryQueued`, `OwnershipTransferred` |

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::LocalDelayQueue;
pub use domain::{ModuleSetup, RecoveryRequest, SwapOwnerError};
pub use ports::{DelayQueuePort, SwapOwnerApi};
pub use service::SwapOwnerModule;

/// Component identifier.
pub const COMPONENT_ID: u8 = 2;
