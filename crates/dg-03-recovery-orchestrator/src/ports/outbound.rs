//! Outbound (Driven) ports for the recovery orchestrator.
//!
//! Deployment and proposal collection live outside the guard. The
//! orchestrator only needs their inputs and outputs.

use shared_types::entities::{Address, Bytes, Hash, U256};

use crate::domain::{OrchestratorError, Proposal};

/// Module factory boundary.
pub trait ModuleDeployer: Send + Sync {
    /// Identity the factory will give a proxy of `master_copy` initialised
    /// with `init_params` under `salt`.
    fn predict_address(
        &self,
        factory: Address,
        master_copy: Address,
        init_params: &Bytes,
        salt: U256,
    ) -> Result<Address, OrchestratorError>;
}

/// Multi-signature proposal boundary.
pub trait ProposalSubmitter: Send + Sync {
    /// Submits `proposal` for signature collection and returns its digest.
    fn submit(&self, proposal: Proposal) -> Result<Hash, OrchestratorError>;
}
