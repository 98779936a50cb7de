//! # In-Memory Avatar
//!
//! Execution sink standing in for the protected wallet. It understands one
//! call, `swapOwner(prev, old, new)` addressed to itself, and records every
//! other call as a successful no-op.
//!
//! Owners form a list whose first entry is linked from
//! [`Address::SENTINEL`], so `prev` must be the owner listed right before
//! `old` (or the sentinel when `old` comes first).

use parking_lot::Mutex;
use shared_types::encoding::{decode_address, signatures, strip_selector};
use shared_types::entities::{Address, Bytes, MetaTransaction};
use tracing::{debug, info};

use crate::ports::{CallReverted, ExecutionSink};

#[derive(Debug, Default)]
struct AvatarState {
    owners: Vec<Address>,
    calls: Vec<MetaTransaction>,
    fail_next: Option<String>,
}

/// A wallet with an ordered owner list.
#[derive(Debug)]
pub struct InMemoryAvatar {
    address: Address,
    state: Mutex<AvatarState>,
}

impl InMemoryAvatar {
    /// Creates a wallet at `address` owned by `owners`, in order.
    #[must_use]
    pub fn new(address: Address, owners: Vec<Address>) -> Self {
        Self {
            address,
            state: Mutex::new(AvatarState {
                owners,
                ..AvatarState::default()
            }),
        }
    }

    /// Wallet identity.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current owners, in list order.
    #[must_use]
    pub fn owners(&self) -> Vec<Address> {
        self.state.lock().owners.clone()
    }

    /// Membership query.
    #[must_use]
    pub fn is_owner(&self, account: &Address) -> bool {
        self.state.lock().owners.contains(account)
    }

    /// Every call carried out so far.
    #[must_use]
    pub fn calls(&self) -> Vec<MetaTransaction> {
        self.state.lock().calls.clone()
    }

    /// Makes the next call revert with `reason`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.state.lock().fail_next = Some(reason.into());
    }

    fn swap_owner(
        owners: &mut [Address],
        prev: Address,
        old: Address,
        new: Address,
    ) -> Result<(), CallReverted> {
        if new.is_zero() || new.is_sentinel() {
            return Err(CallReverted::new("invalid new owner"));
        }
        if owners.contains(&new) {
            return Err(CallReverted::new("new owner is already an owner"));
        }
        if old.is_zero() || old.is_sentinel() {
            return Err(CallReverted::new("invalid old owner"));
        }
        let index = owners
            .iter()
            .position(|owner| *owner == old)
            .ok_or_else(|| CallReverted::new("old owner is not an owner"))?;
        let linked = if index == 0 {
            Address::SENTINEL
        } else {
            owners[index - 1]
        };
        if linked != prev {
            return Err(CallReverted::new("invalid prev owner"));
        }
        owners[index] = new;
        Ok(())
    }
}

impl ExecutionSink for InMemoryAvatar {
    fn perform_call(&self, target: Address, tx: &MetaTransaction) -> Result<Bytes, CallReverted> {
        let mut state = self.state.lock();

        if let Some(reason) = state.fail_next.take() {
            return Err(CallReverted::new(reason));
        }
        if target != self.address {
            return Err(CallReverted::new(format!(
                "call routed to {target}, wallet is {}",
                self.address
            )));
        }

        if tx.to == self.address {
            if let Ok(args) = strip_selector(tx.data.as_slice(), signatures::SWAP_OWNER) {
                let decode = |index| {
                    decode_address(args, index)
                        .map_err(|err| CallReverted::new(format!("malformed swapOwner: {err}")))
                };
                let (prev, old, new) = (decode(0)?, decode(1)?, decode(2)?);
                Self::swap_owner(&mut state.owners, prev, old, new)?;
                info!(wallet = %self.address, %old, %new, "Owner swapped");
            }
        }

        debug!(wallet = %self.address, to = %tx.to, operation = ?tx.operation, "Call performed");
        state.calls.push(tx.clone());
        Ok(Bytes::new())
    }
}
