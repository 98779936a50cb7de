//! # Inbound Port - SwapOwnerApi
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `start_recovery` | module owner |
//! | `transfer_ownership` | module owner |
//! | queries | anyone |

use shared_types::entities::Address;

use crate::domain::SwapOwnerError;

/// Primary API of an owner-swap recovery module.
pub trait SwapOwnerApi: Send + Sync {
    /// Queues `swapOwner(prev_owner, old_owner, new_owner)` against the avatar.
    ///
    /// Returns the queue slot holding the request.
    ///
    /// # Errors
    /// - `NotOwner`: caller is not the module owner
    /// - `ModuleNotEnabled`: module is not enabled on its delay guard
    /// - `CooldownNotElapsed`: the previous request is still cooling down
    /// - `AlreadyExecutable`: the previous request is waiting to be executed
    fn start_recovery(
        &self,
        caller: Address,
        prev_owner: Address,
        old_owner: Address,
        new_owner: Address,
    ) -> Result<u64, SwapOwnerError>;

    /// Hands the module to `new_owner`.
    fn transfer_ownership(&self, caller: Address, new_owner: Address)
        -> Result<(), SwapOwnerError>;

    /// Account allowed to start recoveries.
    fn owner(&self) -> Address;

    /// Queue slot of the most recent request, if any.
    fn last_queued_nonce(&self) -> Option<u64>;
}
