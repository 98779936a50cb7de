//! # Delay Guard Aggregate
//!
//! One guard = one avatar's queue + module registry + timing policy, created
//! together and never shared. Every mutating entry point names its caller so
//! authorization is checked next to the state it protects.
//!
//! | Operation | Caller |
//! |-----------|--------|
//! | `enqueue` | enabled module |
//! | `enable_module` / `disable_module` | avatar or owner |
//! | `set_cooldown` / `set_expiration` | avatar or owner |
//! | `claim_head` / `skip_expired` | avatar or owner |

use shared_types::entities::{Address, Hash, MetaTransaction, Seconds, Timestamp};

use super::entities::{validate_expiration, DelayConfig, GuardSetup, QueuedTransaction, SlotState};
use super::errors::DelayError;
use super::queue::{ClaimedSlot, TransactionQueue};
use super::registry::ModuleRegistry;

/// Per-avatar delay guard state.
#[derive(Debug, Clone)]
pub struct DelayGuard {
    setup: GuardSetup,
    registry: ModuleRegistry,
    queue: TransactionQueue,
}

impl DelayGuard {
    /// Creates a guard with an empty queue and registry.
    ///
    /// # Errors
    /// - `InvalidConfiguration`: zero identity or invalid expiration
    pub fn new(setup: GuardSetup) -> Result<Self, DelayError> {
        setup.validate()?;
        Ok(Self {
            setup,
            registry: ModuleRegistry::new(),
            queue: TransactionQueue::new(),
        })
    }

    /// Guard identity.
    #[must_use]
    pub fn address(&self) -> Address {
        self.setup.guard
    }

    /// Designated admin.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.setup.owner
    }

    /// Protected account.
    #[must_use]
    pub fn avatar(&self) -> Address {
        self.setup.avatar
    }

    /// Account whose execution path carries out queued calls.
    #[must_use]
    pub fn target(&self) -> Address {
        self.setup.target
    }

    /// Current timing policy.
    #[must_use]
    pub fn config(&self) -> DelayConfig {
        self.setup.config
    }

    /// Module membership.
    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Queue contents and counters.
    #[must_use]
    pub fn queue(&self) -> &TransactionQueue {
        &self.queue
    }

    /// Lifecycle state of slot `nonce` at `now`.
    #[must_use]
    pub fn slot_state(&self, nonce: u64, now: Timestamp) -> Option<SlotState> {
        self.queue.slot_state(nonce, &self.setup.config, now)
    }

    /// Fails with `Unauthorized` unless `caller` is the avatar or the owner.
    pub fn authorize(&self, caller: Address) -> Result<(), DelayError> {
        if caller == self.setup.avatar || caller == self.setup.owner {
            Ok(())
        } else {
            Err(DelayError::Unauthorized { caller })
        }
    }

    /// Appends `tx` on behalf of enabled module `caller`.
    pub fn enqueue(
        &mut self,
        caller: Address,
        tx: MetaTransaction,
        now: Timestamp,
    ) -> Result<QueuedTransaction, DelayError> {
        self.registry.ensure_enabled(caller)?;
        Ok(self.queue.push(caller, tx, now).clone())
    }

    /// Grants `module` enqueue capability.
    pub fn enable_module(&mut self, caller: Address, module: Address) -> Result<(), DelayError> {
        self.authorize(caller)?;
        self.registry.enable(module)
    }

    /// Revokes `module`'s enqueue capability. Queued slots are kept.
    pub fn disable_module(&mut self, caller: Address, module: Address) -> Result<(), DelayError> {
        self.authorize(caller)?;
        self.registry.disable(module)
    }

    /// Replaces the cooldown. Applies to every unresolved slot.
    pub fn set_cooldown(&mut self, caller: Address, cooldown: Seconds) -> Result<(), DelayError> {
        self.authorize(caller)?;
        self.setup.config.cooldown = cooldown;
        Ok(())
    }

    /// Replaces the expiration. Applies to every unresolved slot.
    pub fn set_expiration(&mut self, caller: Address, expiration: Seconds) -> Result<(), DelayError> {
        self.authorize(caller)?;
        validate_expiration(expiration)?;
        self.setup.config.expiration = expiration;
        Ok(())
    }

    /// Validates the head for execution and marks it in flight.
    pub fn claim_head(
        &mut self,
        caller: Address,
        now: Timestamp,
        expected: Option<&MetaTransaction>,
    ) -> Result<ClaimedSlot, DelayError> {
        self.authorize(caller)?;
        let config = self.setup.config;
        self.queue.claim_head(&config, now, expected)
    }

    /// Resolves a claimed head as executed.
    pub fn complete(&mut self, nonce: u64) {
        self.queue.complete(nonce);
    }

    /// Drops the claim on the head after a failed call.
    pub fn release(&mut self, nonce: u64) {
        self.queue.release(nonce);
    }

    /// Skips the head if expired. Returns the skipped slot, if any.
    pub fn skip_expired(
        &mut self,
        caller: Address,
        now: Timestamp,
    ) -> Result<Option<(u64, Hash)>, DelayError> {
        self.authorize(caller)?;
        let config = self.setup.config;
        self.queue.skip_expired_head(&config, now)
    }
}
