//! # Swap-Owner Module Service
//!
//! Owner-gated proposer in front of one delay guard. The module's lock is
//! held across the pending check and the enqueue, so two concurrent
//! requests from the same module cannot both pass the check.

use std::sync::Arc;

use parking_lot::Mutex;
use shared_bus::{EventPublisher, GuardEvent};
use shared_types::entities::Address;
use tracing::{info, instrument, warn};

use crate::domain::{ensure_no_pending, ModuleSetup, RecoveryRequest, SwapOwnerError};
use crate::ports::{DelayQueuePort, SwapOwnerApi};

#[derive(Debug)]
struct ModuleState {
    owner: Address,
    last_queued: Option<u64>,
}

/// An owner-swap recovery module.
pub struct SwapOwnerModule {
    address: Address,
    target: Address,
    avatar: Address,
    state: Mutex<ModuleState>,
    delay: Arc<dyn DelayQueuePort>,
    publisher: Arc<dyn EventPublisher>,
}

impl std::fmt::Debug for SwapOwnerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapOwnerModule")
            .field("address", &self.address)
            .field("target", &self.target)
            .field("avatar", &self.avatar)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl SwapOwnerModule {
    /// Constructs the module and publishes `SwapOwnerSetup`.
    ///
    /// # Errors
    /// - `InvalidConfiguration`: any identity in `setup` is zero
    pub fn new(
        initiator: Address,
        setup: ModuleSetup,
        delay: Arc<dyn DelayQueuePort>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self, SwapOwnerError> {
        setup.validate()?;

        info!(
            module = %setup.module,
            target = %setup.target,
            avatar = %setup.avatar,
            owner = %setup.owner,
            "Swap-owner module set up"
        );
        publisher.publish(GuardEvent::SwapOwnerSetup {
            module: setup.module,
            initiator,
            owner: setup.owner,
            avatar: setup.avatar,
            target: setup.target,
        });

        Ok(Self {
            address: setup.module,
            target: setup.target,
            avatar: setup.avatar,
            state: Mutex::new(ModuleState {
                owner: setup.owner,
                last_queued: None,
            }),
            delay,
            publisher,
        })
    }

    /// Module identity.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Delay guard the module enqueues into.
    #[must_use]
    pub fn target(&self) -> Address {
        self.target
    }

    /// Account whose owners are swapped.
    #[must_use]
    pub fn avatar(&self) -> Address {
        self.avatar
    }

    fn queue_request(
        &self,
        state: &ModuleState,
        caller: Address,
        prev_owner: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> Result<u64, SwapOwnerError> {
        Self::ensure_owner(state, caller)?;

        let last = match state.last_queued {
            Some(nonce) => Some((nonce, self.delay.slot_state(self.target, nonce)?)),
            None => None,
        };
        ensure_no_pending(last)?;

        let request = RecoveryRequest {
            avatar: self.avatar,
            prev_owner,
            old_owner,
            new_owner,
        };
        Ok(self
            .delay
            .enqueue(self.target, self.address, request.to_transaction())?)
    }

    fn ensure_owner(state: &ModuleState, caller: Address) -> Result<(), SwapOwnerError> {
        if caller == state.owner {
            Ok(())
        } else {
            Err(SwapOwnerError::NotOwner { account: caller })
        }
    }
}

impl SwapOwnerApi for SwapOwnerModule {
    #[instrument(skip(self), fields(module = %self.address, caller = %caller))]
    fn start_recovery(
        &self,
        caller: Address,
        prev_owner: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> Result<u64, SwapOwnerError> {
        let mut state = self.state.lock();
        let result = self.queue_request(&state, caller, prev_owner, old_owner, new_owner);

        match result {
            Ok(queue_nonce) => {
                state.last_queued = Some(queue_nonce);
                info!(queue_nonce, %old_owner, %new_owner, "Recovery queued");
                self.publisher.publish(GuardEvent::RecoveryQueued {
                    module: self.address,
                    queue_nonce,
                    old_owner,
                    new_owner,
                });
                Ok(queue_nonce)
            }
            Err(err) => {
                warn!(reason = err.kind(), error = %err, "Recovery request rejected");
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(module = %self.address, caller = %caller))]
    fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<(), SwapOwnerError> {
        let mut state = self.state.lock();
        Self::ensure_owner(&state, caller)?;
        if new_owner.is_zero() {
            return Err(SwapOwnerError::InvalidConfiguration(
                "owner can not be zero address".into(),
            ));
        }

        let previous = std::mem::replace(&mut state.owner, new_owner);
        info!(%previous, %new_owner, "Module ownership transferred");
        self.publisher.publish(GuardEvent::OwnershipTransferred {
            module: self.address,
            previous,
            new: new_owner,
        });
        Ok(())
    }

    fn owner(&self) -> Address {
        self.state.lock().owner
    }

    fn last_queued_nonce(&self) -> Option<u64> {
        self.state.lock().last_queued
    }
}
