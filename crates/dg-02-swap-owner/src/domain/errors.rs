//! # Swap-Owner Errors

use dg_01_delay::DelayError;
use shared_types::entities::Address;
use thiserror::Error;

/// Recovery module error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapOwnerError {
    /// Caller is not the module's owner.
    #[error("account {account:?} is not the module owner")]
    NotOwner { account: Address },

    /// Construction parameters rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The module is not enabled on its delay guard.
    #[error("module {module:?} is not enabled on the delay guard")]
    ModuleNotEnabled { module: Address },

    /// The module's previous request is still cooling down.
    #[error("recovery {nonce} is still in cooldown")]
    CooldownNotElapsed { nonce: u64 },

    /// The module's previous request is executable but not yet executed.
    #[error("a recovery is pending execution (queue slot {nonce})")]
    AlreadyExecutable { nonce: u64 },

    /// Any other rejection from the delay guard.
    #[error("delay guard rejected the request: {0}")]
    Delay(DelayError),
}

impl From<DelayError> for SwapOwnerError {
    fn from(err: DelayError) -> Self {
        match err {
            DelayError::ModuleNotEnabled { module } => Self::ModuleNotEnabled { module },
            other => Self::Delay(other),
        }
    }
}

impl SwapOwnerError {
    /// Stable label for metrics and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotOwner { .. } => "not_owner",
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::ModuleNotEnabled { .. } => "module_not_enabled",
            Self::CooldownNotElapsed { .. } => "cooldown_not_elapsed",
            Self::AlreadyExecutable { .. } => "already_executable",
            Self::Delay(inner) => inner.kind(),
        }
    }
}
