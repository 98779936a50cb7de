//! # Guard Container
//!
//! Builds every component for one protected wallet.
//!
//! ## Initialization Order
//!
//! ```text
//! Phase 1: in-memory wallet on the caller's bus and clock
//! Phase 2: recovery planner predicts the guard and module identities
//! Phase 3: delay guard created under the predicted identity
//! Phase 4: swap-owner module constructed and enabled on the guard
//! ```
//!
//! The identities the planner predicts for the on-chain deployment are the
//! identities the in-process components answer to, so a simulated run and a
//! planned proposal describe the same pair of modules.

use std::sync::Arc;

use dg_01_delay::adapters::InMemoryAvatar;
use dg_01_delay::domain::GuardSetup;
use dg_01_delay::{DelayApi, DelayError, DelayService, TimeSource};
use dg_02_swap_owner::{LocalDelayQueue, ModuleSetup, SwapOwnerError, SwapOwnerModule};
use dg_03_recovery_orchestrator::{
    DeterministicDeployer, OrchestratorError, RecoveryPlanner, SetupPlan,
};
use shared_bus::InMemoryEventBus;
use shared_types::entities::{Address, U256};
use thiserror::Error;
use tracing::{info, instrument};

use crate::container::config::{ConfigError, RuntimeConfig};

/// Salt of the delay guard deployment when none is given.
pub const DEFAULT_DELAY_SALT: u64 = 0;

/// Salt of the swap-owner module deployment when none is given.
pub const DEFAULT_SWAP_SALT: u64 = 1;

/// Failure to assemble the container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("planning failed: {0}")]
    Planning(#[from] OrchestratorError),

    #[error("delay guard setup failed: {0}")]
    Delay(#[from] DelayError),

    #[error("recovery module setup failed: {0}")]
    Recovery(#[from] SwapOwnerError),
}

/// Every component guarding one wallet.
pub struct GuardContainer {
    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
    /// Bus every component publishes to.
    pub event_bus: Arc<InMemoryEventBus>,
    /// In-memory stand-in for the protected wallet.
    pub wallet: Arc<InMemoryAvatar>,
    /// Delay queue component.
    pub delay: Arc<DelayService>,
    /// Owner-swap recovery module.
    pub recovery: Arc<SwapOwnerModule>,
    /// Proposal builder for the same wallet.
    pub planner: RecoveryPlanner,
    /// Setup batch whose predicted identities the components use.
    pub setup: SetupPlan,
}

impl GuardContainer {
    /// Builds and wires every component around `event_bus`.
    ///
    /// `wallet_owners` seeds the in-memory wallet's owner list. Subscribe to
    /// the bus before calling this to observe the setup events.
    #[instrument(name = "container_init", skip_all, fields(avatar = %config.avatar))]
    pub fn new(
        config: RuntimeConfig,
        clock: Arc<dyn TimeSource>,
        wallet_owners: Vec<Address>,
        event_bus: Arc<InMemoryEventBus>,
    ) -> Result<Self, ContainerError> {
        config.validate()?;

        info!("Phase 1: creating in-memory wallet");
        let wallet = Arc::new(InMemoryAvatar::new(config.avatar, wallet_owners));

        info!("Phase 2: predicting module identities");
        let planner = RecoveryPlanner::new(config.deployment(), Arc::new(DeterministicDeployer))?;
        let setup = planner.setup_batch(U256::from(DEFAULT_DELAY_SALT), U256::from(DEFAULT_SWAP_SALT))?;

        info!(guard = %setup.delay, "Phase 3: creating delay guard");
        let delay = Arc::new(DelayService::new(clock, wallet.clone(), event_bus.clone()));
        delay.create_guard(
            config.owner,
            GuardSetup::for_avatar(setup.delay, config.owner, config.avatar, config.delay_config()?),
        )?;

        info!(module = %setup.swap, "Phase 4: enabling recovery module");
        let recovery = Arc::new(SwapOwnerModule::new(
            config.owner,
            ModuleSetup {
                module: setup.swap,
                target: setup.delay,
                avatar: config.avatar,
                owner: config.recovery_owner,
            },
            Arc::new(LocalDelayQueue::new(delay.clone())),
            event_bus.clone(),
        )?);
        delay.enable_module(setup.delay, config.avatar, setup.swap)?;

        info!("Container ready");
        Ok(Self {
            config,
            event_bus,
            wallet,
            delay,
            recovery,
            planner,
            setup,
        })
    }

    /// Delay guard identity.
    #[must_use]
    pub fn guard(&self) -> Address {
        self.setup.delay
    }

    /// Recovery module identity.
    #[must_use]
    pub fn module(&self) -> Address {
        self.setup.swap
    }
}
