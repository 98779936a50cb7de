//! Outbound (Driven) ports for the delay component.
//!
//! The clock and the account that actually carries out queued calls live
//! outside the core.

use shared_types::entities::{Address, Bytes, MetaTransaction, Timestamp};
use thiserror::Error;

/// Time source for consistent timestamp handling.
///
/// Read once per call, so every check within one operation sees the same
/// instant.
pub trait TimeSource: Send + Sync {
    /// Returns the current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Rejection raised by the execution sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CallReverted {
    /// Revert reason reported by the target.
    pub reason: String,
}

impl CallReverted {
    /// Creates a revert with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The protected account's execution path.
///
/// The only way a queued payload is carried out. Called without any guard
/// lock held, so an implementation may call back into the delay service.
pub trait ExecutionSink: Send + Sync {
    /// Performs `tx` from `target` and returns its result data.
    fn perform_call(&self, target: Address, tx: &MetaTransaction) -> Result<Bytes, CallReverted>;
}
