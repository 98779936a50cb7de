//! # Pending-Request Rule
//!
//! A module may have at most one live request in its delay guard. Only the
//! module's own most recent slot is consulted: other modules share the queue
//! and their slots must not block this one.
//!
//! | Own last slot | Result |
//! |---------------|--------|
//! | none | allowed |
//! | `Queued` | `CooldownNotElapsed` |
//! | `Executable` | `AlreadyExecutable` |
//! | `Executed` / `Expired` | allowed |

use dg_01_delay::SlotState;

use super::errors::SwapOwnerError;

/// Decides whether a new request may be queued given the module's last slot.
pub fn ensure_no_pending(last: Option<(u64, Option<SlotState>)>) -> Result<(), SwapOwnerError> {
    match last {
        Some((nonce, Some(SlotState::Queued))) => Err(SwapOwnerError::CooldownNotElapsed { nonce }),
        Some((nonce, Some(SlotState::Executable))) => {
            Err(SwapOwnerError::AlreadyExecutable { nonce })
        }
        _ => Ok(()),
    }
}
