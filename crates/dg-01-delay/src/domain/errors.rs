//! # Delay Errors
//!
//! Every failure is reported synchronously by the call that detects it.
//! Apart from `TransactionExpired` (which resolves the head slot before
//! reporting), a failed call leaves the guard untouched.

use shared_types::entities::{Address, Hash, Timestamp};
use thiserror::Error;

/// Delay guard error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelayError {
    /// Caller is neither the avatar nor the guard's owner.
    #[error("unauthorized caller {caller:?}")]
    Unauthorized { caller: Address },

    /// Caller is not an enabled module of this guard.
    #[error("module {module:?} is not enabled")]
    ModuleNotEnabled { module: Address },

    /// Module is already a member.
    #[error("module {module:?} is already enabled")]
    ModuleAlreadyEnabled { module: Address },

    /// Null or sentinel identity offered as a module.
    #[error("invalid module {module:?}")]
    InvalidModule { module: Address },

    /// Execution cursor has caught up with the queue.
    #[error("nothing queued")]
    NothingQueued,

    /// Head slot is still cooling down.
    #[error("transaction {nonce} is still in cooldown until {ready_at}")]
    CooldownNotElapsed { nonce: u64, ready_at: Timestamp },

    /// Head slot's window closed; it has been skipped.
    #[error("transaction {nonce} expired at {deadline} and was skipped")]
    TransactionExpired { nonce: u64, deadline: Timestamp },

    /// Caller-supplied payload does not match the head slot.
    #[error("transaction hash mismatch at {nonce}: queued {queued:?}, supplied {supplied:?}")]
    TransactionHashMismatch {
        nonce: u64,
        queued: Hash,
        supplied: Hash,
    },

    /// The avatar rejected the call. The slot stays at the head.
    #[error("transaction {nonce} reverted: {reason}")]
    ExecutionReverted { nonce: u64, reason: String },

    /// Another execution of the head slot has not returned yet.
    #[error("transaction {nonce} is being executed")]
    ExecutionInProgress { nonce: u64 },

    /// Construction or policy parameters rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No guard registered under this identity.
    #[error("unknown guard {0:?}")]
    UnknownGuard(Address),

    /// A guard already exists under this identity.
    #[error("guard {0:?} already exists")]
    GuardAlreadyExists(Address),
}

impl DelayError {
    /// Stable label for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::ModuleNotEnabled { .. } => "module_not_enabled",
            Self::ModuleAlreadyEnabled { .. } => "module_already_enabled",
            Self::InvalidModule { .. } => "invalid_module",
            Self::NothingQueued => "nothing_queued",
            Self::CooldownNotElapsed { .. } => "cooldown_not_elapsed",
            Self::TransactionExpired { .. } => "transaction_expired",
            Self::TransactionHashMismatch { .. } => "transaction_hash_mismatch",
            Self::ExecutionReverted { .. } => "execution_reverted",
            Self::ExecutionInProgress { .. } => "execution_in_progress",
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::UnknownGuard(_) => "unknown_guard",
            Self::GuardAlreadyExists(_) => "guard_already_exists",
        }
    }

    /// False only for construction failures, which must fail closed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidConfiguration(_))
    }
}
