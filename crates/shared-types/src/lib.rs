//! # Shared Types Crate
//!
//! Identities, payload tuples and ABI encoding used by the delay queue, the
//! owner-swap recovery module and the recovery orchestrator.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the wire shape of a queued call
//!   (`MetaTransaction`) and of a wallet proposal (`SafeTransaction`) is
//!   defined once, here.
//! - **Payload Opacity**: `Bytes` is carried through the queue untouched; only
//!   the edges (recovery module, avatar, orchestrator) encode or decode it.

pub mod encoding;
pub mod entities;
pub mod errors;

pub use encoding::*;
pub use entities::*;
pub use errors::*;
