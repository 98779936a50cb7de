//! # Domain Entities
//!
//! Module configuration and the owner-replacement request it queues.

use serde::{Deserialize, Serialize};
use shared_types::encoding::{decode_address, encode_call, signatures, strip_selector, AbiToken};
use shared_types::entities::{Address, Bytes, MetaTransaction};
use shared_types::errors::EncodingError;

use super::errors::SwapOwnerError;

/// Identities a recovery module is constructed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSetup {
    /// The module's own identity (what the delay guard enables).
    pub module: Address,
    /// Delay guard the module enqueues into.
    pub target: Address,
    /// Account whose owners are swapped.
    pub avatar: Address,
    /// Account allowed to start recoveries.
    pub owner: Address,
}

impl ModuleSetup {
    /// Fails closed on any null identity.
    pub fn validate(&self) -> Result<(), SwapOwnerError> {
        for (name, address) in [
            ("avatar", self.avatar),
            ("target", self.target),
            ("owner", self.owner),
            ("module", self.module),
        ] {
            if address.is_zero() {
                return Err(SwapOwnerError::InvalidConfiguration(format!(
                    "{name} can not be zero address"
                )));
            }
        }
        Ok(())
    }
}

/// "Replace `old_owner` with `new_owner` on `avatar`".
///
/// Lives only as long as the call that builds it; what persists is the
/// encoded call in the queue slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRequest {
    /// Account whose owner list changes.
    pub avatar: Address,
    /// Owner listed right before `old_owner`, or the sentinel.
    pub prev_owner: Address,
    /// Owner being replaced.
    pub old_owner: Address,
    /// Replacement owner.
    pub new_owner: Address,
}

impl RecoveryRequest {
    /// `swapOwner(prev_owner, old_owner, new_owner)` call data.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        Bytes::from(encode_call(
            signatures::SWAP_OWNER,
            &[
                AbiToken::Address(self.prev_owner),
                AbiToken::Address(self.old_owner),
                AbiToken::Address(self.new_owner),
            ],
        ))
    }

    /// The zero-value call against the avatar carrying the swap.
    #[must_use]
    pub fn to_transaction(&self) -> MetaTransaction {
        MetaTransaction::call(self.avatar, self.encode())
    }

    /// Reads a request back from a queued call.
    pub fn decode(tx: &MetaTransaction) -> Result<Self, EncodingError> {
        let args = strip_selector(tx.data.as_slice(), signatures::SWAP_OWNER)?;
        Ok(Self {
            avatar: tx.to,
            prev_owner: decode_address(args, 0)?,
            old_owner: decode_address(args, 1)?,
            new_owner: decode_address(args, 2)?,
        })
    }
}
