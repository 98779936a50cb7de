//! # Recovery Planner
//!
//! Turns a [`DeploymentConfig`] into the two wallet proposals of the
//! recovery flow:
//!
//! ```text
//! setup:    deploy delay ─→ deploy swap ─→ wallet.enableModule(delay) ─→ delay.enableModule(swap)
//! recovery: swap.startRecovery(...)  ...cooldown...  delay.executeNextTx(swapOwner)
//! ```

use std::sync::Arc;

use shared_types::entities::{Address, Bytes, Hash, SafeTransaction, U256};
use tracing::{info, instrument, warn};

use crate::domain::{
    delay_setup_params, deploy_module_call, enable_module_tx, execute_recovery_tx,
    start_recovery_tx, swap_setup_params, DeploymentConfig, OrchestratorError, Proposal,
    RecoveryPlan, SetupPlan,
};
use crate::ports::{ModuleDeployer, ProposalSubmitter};

/// A `deployModule` call and the identity it will produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployModuleTx {
    /// Factory call.
    pub tx: SafeTransaction,
    /// Predicted module identity.
    pub module: Address,
}

/// Builds a factory deployment and predicts its result through `deployer`.
pub fn deploy_module_tx(
    deployer: &dyn ModuleDeployer,
    factory: Address,
    master_copy: Address,
    init_params: &Bytes,
    salt: U256,
) -> Result<DeployModuleTx, OrchestratorError> {
    let module = deployer.predict_address(factory, master_copy, init_params, salt)?;
    Ok(DeployModuleTx {
        tx: deploy_module_call(factory, master_copy, init_params, salt),
        module,
    })
}

/// Submits `batch` from `sender` to `safe` through `submitter`.
///
/// # Errors
/// - `EmptyBatch`: nothing to propose
/// - `InvalidSender`: `sender` is the null identity
pub fn propose(
    safe: Address,
    batch: Vec<SafeTransaction>,
    sender: Address,
    submitter: &dyn ProposalSubmitter,
) -> Result<Hash, OrchestratorError> {
    if batch.is_empty() {
        warn!(%safe, "Refusing to propose an empty batch");
        return Err(OrchestratorError::EmptyBatch);
    }
    if sender.is_zero() {
        warn!(%safe, "Refusing to propose from the zero address");
        return Err(OrchestratorError::InvalidSender(sender));
    }
    let proposal = Proposal::new(safe, sender, batch);
    info!(%safe, %sender, calls = proposal.transactions.len(), hash = %proposal.hash, "Submitting proposal");
    submitter.submit(proposal)
}

/// Plans the setup and recovery batches of one wallet.
pub struct RecoveryPlanner {
    config: DeploymentConfig,
    deployer: Arc<dyn ModuleDeployer>,
}

impl RecoveryPlanner {
    /// Validates `config` and wraps it.
    ///
    /// # Errors
    /// - `InvalidParameter`: a zero identity in `config`
    pub fn new(
        config: DeploymentConfig,
        deployer: Arc<dyn ModuleDeployer>,
    ) -> Result<Self, OrchestratorError> {
        for (name, address) in [
            ("factory", config.factory),
            ("delay master copy", config.delay_master_copy),
            ("swap master copy", config.swap_master_copy),
            ("wallet", config.wallet),
            ("recovery owner", config.recovery_owner),
        ] {
            if address.is_zero() {
                return Err(OrchestratorError::InvalidParameter(format!(
                    "{name} can not be zero address"
                )));
            }
        }
        Ok(Self { config, deployer })
    }

    /// Planning inputs.
    #[must_use]
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Deploys a delay guard and a swap module for the wallet and wires them.
    #[instrument(skip(self), fields(wallet = %self.config.wallet))]
    pub fn setup_batch(&self, delay_salt: U256, swap_salt: U256) -> Result<SetupPlan, OrchestratorError> {
        let c = &self.config;

        let delay_init = delay_setup_params(c.wallet, c.wallet, c.wallet, c.cooldown, c.expiration);
        let delay = deploy_module_tx(
            self.deployer.as_ref(),
            c.factory,
            c.delay_master_copy,
            &delay_init,
            delay_salt,
        )?;

        let swap_init = swap_setup_params(delay.module, c.wallet, c.recovery_owner);
        let swap = deploy_module_tx(
            self.deployer.as_ref(),
            c.factory,
            c.swap_master_copy,
            &swap_init,
            swap_salt,
        )?;

        info!(delay = %delay.module, swap = %swap.module, "Setup planned");
        Ok(SetupPlan {
            delay: delay.module,
            swap: swap.module,
            transactions: vec![
                delay.tx,
                swap.tx,
                enable_module_tx(c.wallet, delay.module),
                enable_module_tx(delay.module, swap.module),
            ],
        })
    }

    /// Replaces `old_owner` (first in the wallet's owner list) with `new_owner`.
    #[instrument(skip(self), fields(wallet = %self.config.wallet))]
    pub fn recovery_batch(
        &self,
        old_owner: Address,
        new_owner: Address,
        swap: Address,
        delay: Address,
    ) -> Result<RecoveryPlan, OrchestratorError> {
        if new_owner.is_zero() || new_owner.is_sentinel() {
            return Err(OrchestratorError::InvalidParameter(
                "new owner can not be zero or sentinel address".into(),
            ));
        }
        if old_owner == new_owner {
            return Err(OrchestratorError::InvalidParameter(
                "old and new owner are the same".into(),
            ));
        }

        let start = start_recovery_tx(old_owner, new_owner, swap);
        let execute = execute_recovery_tx(self.config.wallet, &start.encoded, delay);
        info!(%old_owner, %new_owner, "Recovery planned");
        Ok(RecoveryPlan {
            start: vec![start.tx],
            execute,
            encoded: start.encoded,
        })
    }
}
