//! Outbound (Driven) ports for the recovery module.

use dg_01_delay::{DelayError, SlotState};
use shared_types::entities::{Address, MetaTransaction};

/// The delay guard's queue, as seen by one of its modules.
pub trait DelayQueuePort: Send + Sync {
    /// Appends `tx` to `guard`'s queue with `module` as the caller.
    fn enqueue(&self, guard: Address, module: Address, tx: MetaTransaction)
        -> Result<u64, DelayError>;

    /// Lifecycle state of slot `nonce` of `guard` at the current time.
    fn slot_state(&self, guard: Address, nonce: u64) -> Result<Option<SlotState>, DelayError>;
}
