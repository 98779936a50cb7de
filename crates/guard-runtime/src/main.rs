//! # Delay Guard Runtime
//!
//! Command-line entry point for the delay guard.
//!
//! ## Commands
//!
//! | Command | Output |
//! |---------|--------|
//! | `plan-setup` | Deploy and enable calls for a delay guard and a swap-owner module |
//! | `plan-recovery` | `startRecovery` now, `executeNextTx` after the cooldown |
//! | `simulate` | Runs a recovery through the in-process components |
//!
//! Every command prints JSON on stdout. Logs go to stderr.
//!
//! ## Startup Sequence
//!
//! 1. Layer command-line overrides over the environment
//! 2. Validate configuration (zero identities and bad policies fail closed)
//! 3. Register metrics and install logging
//! 4. Run the command

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use dg_01_delay::adapters::ManualTimeSource;
use dg_01_delay::ports::SystemTimeSource;
use dg_01_delay::TimeSource;
use dg_03_recovery_orchestrator::{
    propose, DeterministicDeployer, Proposal, RecordingProposalSubmitter, RecoveryPlan,
    RecoveryPlanner, SetupPlan,
};
use guard_runtime::container::services::{DEFAULT_DELAY_SALT, DEFAULT_SWAP_SALT};
use guard_runtime::{run_simulation, GuardContainer, MetricsHandler, RuntimeConfig, SimulationParams};
use shared_bus::InMemoryEventBus;
use shared_types::entities::{Address, SafeTransaction, Seconds, U256};

#[derive(Debug, Parser)]
#[command(name = "delay-guard", version, about = "Time-delayed owner recovery for a protected wallet")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Values that take precedence over the `DG_*` environment.
#[derive(Debug, Args)]
struct Overrides {
    /// Protected wallet (`DG_AVATAR`).
    #[arg(long, global = true)]
    avatar: Option<Address>,

    /// Recovery module owner (`DG_RECOVERY_OWNER`).
    #[arg(long, global = true)]
    recovery_owner: Option<Address>,

    /// Guard admin (`DG_OWNER`).
    #[arg(long, global = true)]
    owner: Option<Address>,

    /// Cooldown in seconds (`DG_COOLDOWN_SECS`).
    #[arg(long, global = true)]
    cooldown: Option<Seconds>,

    /// Expiration in seconds, 0 for never (`DG_EXPIRATION_SECS`).
    #[arg(long, global = true)]
    expiration: Option<Seconds>,

    /// Emit JSON log lines (`DG_JSON_LOGS`).
    #[arg(long, global = true)]
    json_logs: bool,
}

impl Overrides {
    fn variables(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        let addresses = [
            ("DG_AVATAR", self.avatar),
            ("DG_RECOVERY_OWNER", self.recovery_owner),
            ("DG_OWNER", self.owner),
        ];
        for (key, value) in addresses {
            if let Some(address) = value {
                vars.insert(key, address.to_hex());
            }
        }
        if let Some(cooldown) = self.cooldown {
            vars.insert("DG_COOLDOWN_SECS", cooldown.to_string());
        }
        if let Some(expiration) = self.expiration {
            vars.insert("DG_EXPIRATION_SECS", expiration.to_string());
        }
        if self.json_logs {
            vars.insert("DG_JSON_LOGS", "true".to_string());
        }
        vars
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan the deployment and wiring of a delay guard and a recovery module.
    PlanSetup {
        #[command(flatten)]
        salts: Salts,

        /// Propose the batch from this account.
        #[arg(long)]
        sender: Option<Address>,
    },

    /// Plan an owner swap through the recovery module.
    PlanRecovery {
        /// Owner being replaced (first in the wallet's owner list).
        #[arg(long)]
        old_owner: Address,

        /// Replacement owner.
        #[arg(long)]
        new_owner: Address,

        /// Deployed delay guard. Predicted from the salts when omitted.
        #[arg(long)]
        delay: Option<Address>,

        /// Deployed recovery module. Predicted from the salts when omitted.
        #[arg(long)]
        swap: Option<Address>,

        #[command(flatten)]
        salts: Salts,

        /// Propose the `startRecovery` batch from this account.
        #[arg(long)]
        sender: Option<Address>,
    },

    /// Run a recovery against in-memory components on a simulated clock.
    Simulate {
        /// Owner being replaced.
        #[arg(long)]
        old_owner: Address,

        /// Replacement owner.
        #[arg(long)]
        new_owner: Address,

        /// Further wallet owners, after the one being replaced.
        #[arg(long = "co-owner")]
        co_owners: Vec<Address>,

        /// Seconds to wait past the cooldown before executing.
        #[arg(long, default_value_t = 0)]
        extra_wait: Seconds,

        /// Print the Prometheus exposition after the report.
        #[arg(long)]
        metrics: bool,
    },
}

#[derive(Debug, Args)]
struct Salts {
    /// Salt of the delay guard deployment.
    #[arg(long, default_value_t = DEFAULT_DELAY_SALT)]
    delay_salt: u64,

    /// Salt of the recovery module deployment.
    #[arg(long, default_value_t = DEFAULT_SWAP_SALT)]
    swap_salt: u64,
}

#[derive(Serialize)]
struct SetupOutput {
    #[serde(flatten)]
    plan: SetupPlan,
    proposal: Option<Proposal>,
}

#[derive(Serialize)]
struct RecoveryOutput {
    delay: Address,
    swap: Address,
    #[serde(flatten)]
    plan: RecoveryPlan,
    proposal: Option<Proposal>,
}

fn load_config(overrides: &Overrides) -> Result<RuntimeConfig> {
    let vars = overrides.variables();
    RuntimeConfig::from_lookup(|key| vars.get(key).cloned().or_else(|| env::var(key).ok()))
        .context("Invalid configuration")
}

fn submit(safe: Address, batch: Vec<SafeTransaction>, sender: Option<Address>) -> Result<Option<Proposal>> {
    let Some(sender) = sender else {
        return Ok(None);
    };
    let submitter = RecordingProposalSubmitter::new();
    propose(safe, batch, sender, &submitter).context("Proposal rejected")?;
    Ok(submitter.proposals().pop())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.overrides)?;

    let mut telemetry = config.telemetry.clone();
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    guard_telemetry::init_telemetry(&telemetry).context("Failed to initialise telemetry")?;
    info!(avatar = %config.avatar, cooldown = config.cooldown, expiration = config.expiration, "Delay guard runtime starting");

    match cli.command {
        Command::PlanSetup { salts, sender } => {
            let planner = RecoveryPlanner::new(config.deployment(), Arc::new(DeterministicDeployer))?;
            let plan = planner.setup_batch(U256::from(salts.delay_salt), U256::from(salts.swap_salt))?;
            let proposal = submit(config.avatar, plan.transactions.clone(), sender)?;
            print_json(&SetupOutput { plan, proposal })
        }

        Command::PlanRecovery {
            old_owner,
            new_owner,
            delay,
            swap,
            salts,
            sender,
        } => {
            let planner = RecoveryPlanner::new(config.deployment(), Arc::new(DeterministicDeployer))?;
            let (delay, swap) = match (delay, swap) {
                (Some(delay), Some(swap)) => (delay, swap),
                (delay, swap) => {
                    let setup = planner
                        .setup_batch(U256::from(salts.delay_salt), U256::from(salts.swap_salt))?;
                    (delay.unwrap_or(setup.delay), swap.unwrap_or(setup.swap))
                }
            };
            let plan = planner.recovery_batch(old_owner, new_owner, swap, delay)?;
            let proposal = submit(config.avatar, plan.start.clone(), sender)?;
            print_json(&RecoveryOutput {
                delay,
                swap,
                plan,
                proposal,
            })
        }

        Command::Simulate {
            old_owner,
            new_owner,
            co_owners,
            extra_wait,
            metrics,
        } => {
            let clock = Arc::new(ManualTimeSource::new(SystemTimeSource.now()));
            let bus = Arc::new(InMemoryEventBus::new());
            let handler = MetricsHandler::new(bus.as_ref());
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let metrics_task = tokio::spawn(handler.run(shutdown_rx));

            let mut owners = vec![old_owner];
            owners.extend(co_owners);
            let container = GuardContainer::new(config, clock.clone(), owners, bus)?;
            let report = run_simulation(
                &container,
                &clock,
                SimulationParams {
                    old_owner,
                    new_owner,
                    extra_wait,
                },
            );

            // A send error only means the handler already stopped.
            let _ = shutdown_tx.send(true);
            let recorded = metrics_task.await.context("Metrics handler failed")?;
            info!(recorded, swapped = report.swapped(), "Simulation finished");

            print_json(&report)?;
            if metrics {
                print!("{}", guard_telemetry::encode_metrics()?);
            }
            Ok(())
        }
    }
}
