//! # Guard Events
//!
//! Observable events emitted by the delay queue and the recovery module.
//! Every event names the component (guard or module address) that emitted
//! it, so one bus can carry the traffic of many avatars.

use serde::{Deserialize, Serialize};
use shared_types::entities::{Address, Bytes, Hash, Operation, Seconds, U256};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardEvent {
    // =========================================================================
    // DELAY QUEUE
    // =========================================================================
    /// A delay guard was initialised for an avatar.
    DelaySetup {
        /// Guard identity.
        guard: Address,
        /// Caller that created the guard.
        initiator: Address,
        /// Designated admin.
        owner: Address,
        /// Protected account.
        avatar: Address,
        /// Account whose execution path carries out queued calls.
        target: Address,
    },

    /// A module appended a slot to the queue.
    TransactionAdded {
        /// Guard identity.
        guard: Address,
        /// Index of the new slot.
        queue_nonce: u64,
        /// Hash binding the slot contents.
        tx_hash: Hash,
        /// Call destination.
        to: Address,
        /// Attached value.
        value: U256,
        /// Opaque call data.
        data: Bytes,
        /// Call kind.
        operation: Operation,
    },

    /// The head slot was carried out against the avatar.
    TransactionExecuted {
        /// Guard identity.
        guard: Address,
        /// Executed slot index.
        nonce: u64,
        /// Hash of the executed slot.
        tx_hash: Hash,
    },

    /// The head slot passed its expiration and was skipped.
    TransactionExpired {
        /// Guard identity.
        guard: Address,
        /// Skipped slot index.
        nonce: u64,
        /// Hash of the skipped slot.
        tx_hash: Hash,
    },

    /// The guard's cooldown changed.
    CooldownSet {
        /// Guard identity.
        guard: Address,
        /// New cooldown.
        cooldown: Seconds,
    },

    /// The guard's expiration changed.
    ExpirationSet {
        /// Guard identity.
        guard: Address,
        /// New expiration (0 = never).
        expiration: Seconds,
    },

    // =========================================================================
    // MODULE REGISTRY
    // =========================================================================
    /// A module may now enqueue.
    ModuleEnabled {
        /// Guard identity.
        guard: Address,
        /// Enabled module.
        module: Address,
    },

    /// A module may no longer enqueue.
    ModuleDisabled {
        /// Guard identity.
        guard: Address,
        /// Disabled module.
        module: Address,
    },

    // =========================================================================
    // RECOVERY MODULE
    // =========================================================================
    /// An owner-swap recovery module was constructed.
    SwapOwnerSetup {
        /// Module identity.
        module: Address,
        /// Caller that constructed it.
        initiator: Address,
        /// Recovery owner.
        owner: Address,
        /// Account whose owners are swapped.
        avatar: Address,
        /// Delay guard the module enqueues into.
        target: Address,
    },

    /// A recovery request was queued.
    RecoveryQueued {
        /// Module identity.
        module: Address,
        /// Queue slot holding the request.
        queue_nonce: u64,
        /// Owner being replaced.
        old_owner: Address,
        /// Replacement owner.
        new_owner: Address,
    },

    /// The recovery module's owner changed.
    OwnershipTransferred {
        /// Module identity.
        module: Address,
        /// Previous owner.
        previous: Address,
        /// New owner.
        new: Address,
    },
}

impl GuardEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::DelaySetup { .. }
            | Self::TransactionAdded { .. }
            | Self::TransactionExecuted { .. }
            | Self::TransactionExpired { .. }
            | Self::CooldownSet { .. }
            | Self::ExpirationSet { .. } => EventTopic::Delay,
            Self::ModuleEnabled { .. } | Self::ModuleDisabled { .. } => EventTopic::Modules,
            Self::SwapOwnerSetup { .. }
            | Self::RecoveryQueued { .. }
            | Self::OwnershipTransferred { .. } => EventTopic::Recovery,
        }
    }

    /// Get the identity of the component that emitted this event.
    #[must_use]
    pub fn emitter(&self) -> Address {
        match self {
            Self::DelaySetup { guard, .. }
            | Self::TransactionAdded { guard, .. }
            | Self::TransactionExecuted { guard, .. }
            | Self::TransactionExpired { guard, .. }
            | Self::CooldownSet { guard, .. }
            | Self::ExpirationSet { guard, .. }
            | Self::ModuleEnabled { guard, .. }
            | Self::ModuleDisabled { guard, .. } => *guard,
            Self::SwapOwnerSetup { module, .. }
            | Self::RecoveryQueued { module, .. }
            | Self::OwnershipTransferred { module, .. } => *module,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Queue lifecycle and guard configuration.
    Delay,
    /// Module registry membership.
    Modules,
    /// Recovery module activity.
    Recovery,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Emitters to include. Empty means all emitters.
    pub emitters: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            emitters: Vec::new(),
        }
    }

    /// Create a filter for events from specific guards or modules.
    #[must_use]
    pub fn from_emitters(emitters: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            emitters,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &GuardEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let emitter_match = self.emitters.is_empty() || self.emitters.contains(&event.emitter());

        topic_match && emitter_match
    }
}
