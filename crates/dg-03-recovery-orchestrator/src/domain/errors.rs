//! # Orchestrator Errors

use shared_types::entities::Address;
use shared_types::errors::EncodingError;
use thiserror::Error;

/// Recovery orchestrator error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// A proposal must carry at least one call.
    #[error("proposal batch is empty")]
    EmptyBatch,

    /// The proposing account is not usable.
    #[error("invalid proposal sender {0:?}")]
    InvalidSender(Address),

    /// A planning input was rejected.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The deployment boundary failed to predict a module identity.
    #[error("module deployment failed: {0}")]
    Deployment(String),

    /// The proposal boundary rejected the batch.
    #[error("proposal submission failed: {0}")]
    Submission(String),

    /// Call data could not be built or read.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}
