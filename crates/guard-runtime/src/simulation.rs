//! # Recovery Simulation
//!
//! Plays one owner swap through the wired components on a manual clock:
//!
//! ```text
//! t0            startRecovery(SENTINEL, old, new)     queued at nonce n
//! t0            execute                                rejected, cooldown
//! t0+cooldown   execute                                swapOwner runs on the wallet
//! ```
//!
//! Waiting past the expiration window instead shows the request being
//! skipped as expired.

use dg_01_delay::adapters::ManualTimeSource;
use dg_01_delay::service::ServiceStats;
use dg_01_delay::DelayApi;
use dg_02_swap_owner::SwapOwnerApi;
use guard_telemetry::record_rejection;
use serde::Serialize;
use shared_types::entities::{Address, Seconds, Timestamp};
use tracing::{info, warn};

use crate::container::GuardContainer;

/// What to simulate.
#[derive(Clone, Copy, Debug)]
pub struct SimulationParams {
    /// Owner being replaced. Must be the wallet's first owner.
    pub old_owner: Address,
    /// Replacement owner.
    pub new_owner: Address,
    /// Seconds to wait past the cooldown before executing.
    pub extra_wait: Seconds,
}

/// Result of one simulated call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    /// The call went through.
    Ok {
        /// Short description of the effect.
        detail: String,
    },
    /// The call was refused.
    Rejected {
        /// Stable error kind.
        reason: &'static str,
        /// Human-readable error.
        message: String,
    },
}

/// One simulated call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationStep {
    /// Clock reading when the call was made.
    pub at: Timestamp,
    /// Operation name.
    pub action: &'static str,
    /// What happened.
    #[serde(flatten)]
    pub result: StepResult,
}

/// Everything a simulation observed.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    /// Delay guard identity.
    pub guard: Address,
    /// Recovery module identity.
    pub module: Address,
    /// Wallet owners before the recovery.
    pub owners_before: Vec<Address>,
    /// Wallet owners after the last step.
    pub owners_after: Vec<Address>,
    /// Calls in the order they were made.
    pub steps: Vec<SimulationStep>,
    /// Delay service counters at the end.
    pub stats: ServiceStats,
}

impl SimulationReport {
    /// True when the owner swap reached the wallet.
    #[must_use]
    pub fn swapped(&self) -> bool {
        self.owners_before != self.owners_after
    }
}

struct Recorder<'a> {
    clock: &'a ManualTimeSource,
    steps: Vec<SimulationStep>,
}

impl Recorder<'_> {
    fn record<T, E>(
        &mut self,
        action: &'static str,
        result: Result<T, E>,
        detail: impl FnOnce(&T) -> String,
        kind: impl FnOnce(&E) -> &'static str,
    ) -> Option<T>
    where
        E: std::fmt::Display,
    {
        let at = dg_01_delay::TimeSource::now(self.clock);
        match result {
            Ok(value) => {
                let detail = detail(&value);
                info!(at, action, %detail, "Step succeeded");
                self.steps.push(SimulationStep {
                    at,
                    action,
                    result: StepResult::Ok { detail },
                });
                Some(value)
            }
            Err(err) => {
                let reason = kind(&err);
                warn!(at, action, reason, error = %err, "Step rejected");
                // Expiry skips are counted from their bus event.
                if reason != "transaction_expired" {
                    record_rejection(reason);
                }
                self.steps.push(SimulationStep {
                    at,
                    action,
                    result: StepResult::Rejected {
                        reason,
                        message: err.to_string(),
                    },
                });
                None
            }
        }
    }
}

/// Runs the recovery flow against `container`, advancing `clock`.
///
/// `clock` must be the time source `container` was built with.
pub fn run_simulation(
    container: &GuardContainer,
    clock: &ManualTimeSource,
    params: SimulationParams,
) -> SimulationReport {
    let guard = container.guard();
    let avatar = container.config.avatar;
    let owners_before = container.wallet.owners();
    let mut recorder = Recorder {
        clock,
        steps: Vec::new(),
    };

    let queued = recorder.record(
        "start_recovery",
        container.recovery.start_recovery(
            container.config.recovery_owner,
            Address::SENTINEL,
            params.old_owner,
            params.new_owner,
        ),
        |nonce| format!("queued at nonce {nonce}"),
        |err| err.kind(),
    );

    if queued.is_some() {
        recorder.record(
            "execute",
            container.delay.execute(guard, avatar),
            |outcome| format!("executed nonce {}", outcome.nonce),
            |err| err.kind(),
        );

        clock.advance(container.config.cooldown.saturating_add(params.extra_wait));

        recorder.record(
            "execute",
            container.delay.execute(guard, avatar),
            |outcome| format!("executed nonce {}", outcome.nonce),
            |err| err.kind(),
        );
    }

    SimulationReport {
        guard,
        module: container.module(),
        owners_before,
        owners_after: container.wallet.owners(),
        steps: recorder.steps,
        stats: container.delay.stats(),
    }
}
