//! # Inbound Port - DelayApi
//!
//! Primary driving port exposing the delay guard to modules, the avatar and
//! the guard's owner.
//!
//! ## Authorization
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `enqueue` | module enabled on the guard |
//! | `execute`, `execute_next` | avatar or owner |
//! | `skip_expired` | avatar or owner |
//! | `enable_module`, `disable_module` | avatar or owner |
//! | `set_cooldown`, `set_expiration` | avatar or owner |
//! | queries | anyone |

use shared_types::entities::{Address, Hash, MetaTransaction, Seconds, Timestamp};

use crate::domain::{
    DelayConfig, DelayError, ExecutionOutcome, GuardSetup, GuardStatus, QueuedTransaction,
    SlotState,
};

/// Primary API for the delay component.
///
/// Every call names the guard it addresses; one service hosts the guards of
/// many avatars.
///
/// # Example
///
/// ```rust,ignore
/// use dg_01_delay::ports::DelayApi;
///
/// fn example(delay: &impl DelayApi, guard: Address, module: Address, avatar: Address) {
///     let nonce = delay.enqueue(guard, module, tx)?;
///     // ... cooldown elapses ...
///     let outcome = delay.execute(guard, avatar)?;
///     assert_eq!(outcome.nonce, nonce);
/// }
/// ```
pub trait DelayApi: Send + Sync {
    /// Registers a new guard with an empty queue and registry.
    ///
    /// # Errors
    /// - `InvalidConfiguration`: zero identity or invalid expiration
    /// - `GuardAlreadyExists`: identity taken
    fn create_guard(&self, initiator: Address, setup: GuardSetup) -> Result<(), DelayError>;

    /// Appends `tx` to the guard's queue and returns its slot index.
    ///
    /// # Errors
    /// - `ModuleNotEnabled`: `caller` is not an enabled module
    fn enqueue(&self, guard: Address, caller: Address, tx: MetaTransaction)
        -> Result<u64, DelayError>;

    /// Executes the head slot against the guard's target.
    ///
    /// # Errors
    /// - `Unauthorized`: caller is neither avatar nor owner
    /// - `NothingQueued`: cursor has caught up with the queue
    /// - `CooldownNotElapsed`: head is still cooling down
    /// - `TransactionExpired`: head's window closed; the head was skipped
    /// - `ExecutionReverted`: target rejected the call; cursor unchanged
    /// - `ExecutionInProgress`: head is already being executed
    fn execute(&self, guard: Address, caller: Address) -> Result<ExecutionOutcome, DelayError>;

    /// As [`DelayApi::execute`], but the head must match `expected`.
    ///
    /// # Errors
    /// - `TransactionHashMismatch`: head differs from `expected`
    fn execute_next(
        &self,
        guard: Address,
        caller: Address,
        expected: &MetaTransaction,
    ) -> Result<ExecutionOutcome, DelayError>;

    /// Skips the head slot if its window has closed. Returns true if skipped.
    fn skip_expired(&self, guard: Address, caller: Address) -> Result<bool, DelayError>;

    /// Replaces the cooldown.
    fn set_cooldown(&self, guard: Address, caller: Address, cooldown: Seconds)
        -> Result<(), DelayError>;

    /// Replaces the expiration (0 or at least 60 seconds).
    fn set_expiration(
        &self,
        guard: Address,
        caller: Address,
        expiration: Seconds,
    ) -> Result<(), DelayError>;

    /// Grants `module` enqueue capability.
    fn enable_module(&self, guard: Address, caller: Address, module: Address)
        -> Result<(), DelayError>;

    /// Revokes `module`'s enqueue capability.
    fn disable_module(
        &self,
        guard: Address,
        caller: Address,
        module: Address,
    ) -> Result<(), DelayError>;

    /// Membership query.
    fn is_module_enabled(&self, guard: Address, module: Address) -> Result<bool, DelayError>;

    /// Enabled modules in enable order.
    fn enabled_modules(&self, guard: Address) -> Result<Vec<Address>, DelayError>;

    /// Up to `page_size` modules after `start` (`Address::SENTINEL` for the
    /// first page), plus the `start` of the next page if there is one.
    fn modules_paginated(
        &self,
        guard: Address,
        start: Address,
        page_size: usize,
    ) -> Result<(Vec<Address>, Option<Address>), DelayError>;

    /// Index of the next slot to be filled.
    fn queue_nonce(&self, guard: Address) -> Result<u64, DelayError>;

    /// Execution cursor.
    fn tx_nonce(&self, guard: Address) -> Result<u64, DelayError>;

    /// Hash of slot `nonce`.
    fn tx_hash(&self, guard: Address, nonce: u64) -> Result<Option<Hash>, DelayError>;

    /// Enqueue time of slot `nonce`.
    fn tx_created_at(&self, guard: Address, nonce: u64) -> Result<Option<Timestamp>, DelayError>;

    /// Full contents of slot `nonce`.
    fn transaction(&self, guard: Address, nonce: u64)
        -> Result<Option<QueuedTransaction>, DelayError>;

    /// Lifecycle state of slot `nonce` at the current time.
    fn slot_state(&self, guard: Address, nonce: u64) -> Result<Option<SlotState>, DelayError>;

    /// Current timing policy.
    fn config(&self, guard: Address) -> Result<DelayConfig, DelayError>;

    /// Summary of the guard.
    fn status(&self, guard: Address) -> Result<GuardStatus, DelayError>;
}
