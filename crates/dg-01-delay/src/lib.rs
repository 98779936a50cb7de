//! # DG-01 Delay - Time-Delayed Authorization Guard
//!
//! **Component ID:** 1
//! **Status:** Core
//!
//! ## Purpose
//!
//! A protected account (the avatar) does not run sensitive calls directly.
//! Enabled modules append calls to a per-avatar queue; the avatar (or the
//! guard's owner) carries out the head of the queue once its cooldown has
//! elapsed and before its expiration window closes.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `tx_nonce <= queue_nonce` | `domain/queue.rs` - `resolve_head()` |
//! | INVARIANT-2 | Slots below the cursor never run | `domain/queue.rs` - `claim_head()` reads the cursor slot only |
//! | INVARIANT-3 | Head runs only inside its window | `domain/entities.rs` - `DelayConfig::in_cooldown()`, `is_expired()` |
//! | INVARIANT-4 | Only enabled modules enqueue; only avatar/owner advance | `domain/guard.rs` - `enqueue()`, `authorize()` |
//!
//! ## Slot Lifecycle
//!
//! ```text
//! [QUEUED] ──cooldown──→ [EXECUTABLE] ──execute──→ [EXECUTED]
//!                              │
//!                              └──expiration (> 0)──→ [EXPIRED]
//! ```
//!
//! The window is inclusive at both ends: a slot created at `t` runs at
//! `t + cooldown` and still runs at `t + cooldown + expiration`.
//!
//! ## Execution Protocol
//!
//! | Stage | Lock held | Effect |
//! |-------|-----------|--------|
//! | Claim | guard | timing checks, head marked in flight |
//! | Call | none | `ExecutionSink::perform_call()` |
//! | Complete | guard | cursor advanced, `TransactionExecuted` published |
//! | Release | guard | revert reported, head kept for retry |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `TimeSource` | One reading of "now" per call |
//! | `ExecutionSink` | Carries out the head slot from the target |
//! | `EventPublisher` | Observable state changes |
//!
//! ## Usage Example
//!
//! ```ignore
//! use dg_01_delay::prelude::*;
//!
//! let delay = DelayService::new(clock, avatar_sink, bus);
//! delay.create_guard(owner, GuardSetup::for_avatar(guard, owner, avatar, config))?;
//! delay.enable_module(guard, avatar, module)?;
//! let nonce = delay.enqueue(guard, module, tx)?;
//! // ... cooldown elapses ...
//! let outcome = delay.execute(guard, avatar)?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{InMemoryAvatar, ManualTimeSource};
    pub use crate::domain::{
        DelayConfig, DelayError, DelayGuard, ExecutionOutcome, GuardSetup, GuardStatus,
        ModuleRegistry, QueuedTransaction, Resolution, SlotState, TransactionQueue,
        MIN_EXPIRATION,
    };
    pub use crate::ports::{CallReverted, DelayApi, ExecutionSink, SystemTimeSource, TimeSource};
    pub use crate::service::{DelayService, ServiceStats};
}

pub use domain::{DelayConfig, DelayError, GuardSetup, SlotState};
pub use ports::{DelayApi, ExecutionSink, TimeSource};
pub use service::DelayService;

/// Component identifier.
pub const COMPONENT_ID: u8 = 1;
