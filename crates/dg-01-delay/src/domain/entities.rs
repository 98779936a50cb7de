//! # Domain Entities
//!
//! Queue slots, guard configuration and execution results.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Bytes, Hash, MetaTransaction, Seconds, Timestamp};

use super::errors::DelayError;

/// Smallest non-zero expiration accepted by a guard.
pub const MIN_EXPIRATION: Seconds = 60;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Timing policy of a guard.
///
/// Changes apply to every unresolved slot on its next evaluation; slots do
/// not snapshot the policy in force when they were queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Minimum time a slot waits before it may run.
    pub cooldown: Seconds,
    /// Window after the cooldown during which the slot may run. 0 = forever.
    pub expiration: Seconds,
}

impl DelayConfig {
    /// Validated constructor.
    pub fn new(cooldown: Seconds, expiration: Seconds) -> Result<Self, DelayError> {
        let config = Self {
            cooldown,
            expiration,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the expiration is 0 or at least [`MIN_EXPIRATION`].
    pub fn validate(&self) -> Result<(), DelayError> {
        validate_expiration(self.expiration)
    }

    /// True when slots never expire.
    #[must_use]
    pub const fn never_expires(&self) -> bool {
        self.expiration == 0
    }

    /// First instant a slot created at `created_at` may run.
    #[must_use]
    pub const fn ready_at(&self, created_at: Timestamp) -> Timestamp {
        created_at.saturating_add(self.cooldown)
    }

    /// Last instant a slot created at `created_at` may run, if it can expire.
    #[must_use]
    pub const fn deadline(&self, created_at: Timestamp) -> Option<Timestamp> {
        if self.expiration == 0 {
            None
        } else {
            Some(self.ready_at(created_at).saturating_add(self.expiration))
        }
    }

    /// Cooldown has not yet elapsed at `now`.
    #[must_use]
    pub const fn in_cooldown(&self, created_at: Timestamp, now: Timestamp) -> bool {
        now < self.ready_at(created_at)
    }

    /// The execution window closed before `now`.
    #[must_use]
    pub const fn is_expired(&self, created_at: Timestamp, now: Timestamp) -> bool {
        match self.deadline(created_at) {
            Some(deadline) => now > deadline,
            None => false,
        }
    }
}

/// Rejects expirations in `(0, MIN_EXPIRATION)`.
pub fn validate_expiration(expiration: Seconds) -> Result<(), DelayError> {
    if expiration != 0 && expiration < MIN_EXPIRATION {
        return Err(DelayError::InvalidConfiguration(format!(
            "expiration must be 0 or at least {MIN_EXPIRATION} seconds, got {expiration}"
        )));
    }
    Ok(())
}

/// Identities and policy a guard is created with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardSetup {
    /// The guard's own identity (what modules target).
    pub guard: Address,
    /// Designated admin.
    pub owner: Address,
    /// Protected account.
    pub avatar: Address,
    /// Account whose execution path carries out queued calls.
    pub target: Address,
    /// Timing policy.
    pub config: DelayConfig,
}

impl GuardSetup {
    /// Setup where the avatar is also the execution target.
    #[must_use]
    pub fn for_avatar(guard: Address, owner: Address, avatar: Address, config: DelayConfig) -> Self {
        Self {
            guard,
            owner,
            avatar,
            target: avatar,
            config,
        }
    }

    /// Fails closed on null identities or an invalid policy.
    pub fn validate(&self) -> Result<(), DelayError> {
        for (name, address) in [
            ("guard", self.guard),
            ("owner", self.owner),
            ("avatar", self.avatar),
            ("target", self.target),
        ] {
            if address.is_zero() {
                return Err(DelayError::InvalidConfiguration(format!(
                    "{name} can not be zero address"
                )));
            }
        }
        self.config.validate()
    }
}

// =============================================================================
// QUEUE SLOTS
// =============================================================================

/// How a slot below the execution cursor was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Carried out against the avatar.
    Executed,
    /// Skipped because its window closed.
    Expired,
}

/// An appended queue slot. Immutable apart from its resolution marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTransaction {
    /// Slot index.
    pub nonce: u64,
    /// The queued call.
    pub tx: MetaTransaction,
    /// Hash binding the call contents.
    pub tx_hash: Hash,
    /// Module that queued it.
    pub module: Address,
    /// Enqueue time.
    pub created_at: Timestamp,
    /// Set when the cursor moves past the slot by execution or expiry.
    pub resolution: Option<Resolution>,
}

/// Lifecycle state of a slot.
///
/// ```text
/// Queued ──cooldown──→ Executable ──execute──→ Executed
///                           │
///                           └──expiration (> 0)──→ Expired
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    /// Waiting for the cooldown.
    Queued,
    /// Timing-eligible. Runs once it reaches the head of the queue.
    Executable,
    /// Terminal: carried out.
    Executed,
    /// Terminal: window closed.
    Expired,
}

impl SlotState {
    /// True for `Executed` and `Expired`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Executed | Self::Expired)
    }
}

impl From<Resolution> for SlotState {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Executed => Self::Executed,
            Resolution::Expired => Self::Expired,
        }
    }
}

/// Result of a successful execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Executed slot index.
    pub nonce: u64,
    /// Hash of the executed call.
    pub tx_hash: Hash,
    /// Data returned by the avatar.
    pub return_data: Bytes,
}

/// Point-in-time summary of one guard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardStatus {
    /// Guard identity.
    pub guard: Address,
    /// Protected account.
    pub avatar: Address,
    /// Timing policy.
    pub config: DelayConfig,
    /// Index of the next slot to be filled.
    pub queue_nonce: u64,
    /// Execution cursor.
    pub tx_nonce: u64,
    /// Enabled modules in enable order.
    pub modules: Vec<Address>,
}

impl GuardStatus {
    /// Slots at or above the cursor.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.queue_nonce.saturating_sub(self.tx_nonce)
    }
}
