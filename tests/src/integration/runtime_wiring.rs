//! # Runtime Wiring
//!
//! The runtime container, the planner and the metrics subscriber together:
//! the identities the planner proposes are the ones the components answer
//! to, and every component event reaches the metrics registry.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dg_01_delay::prelude::*;
    use dg_02_swap_owner::SwapOwnerApi;
    use dg_03_recovery_orchestrator::{
        propose, RecordingProposalSubmitter, DEFAULT_MODULE_FACTORY,
    };
    use guard_runtime::{
        run_simulation, GuardContainer, MetricsHandler, RuntimeConfig, SimulationParams,
        StepResult,
    };
    use guard_telemetry::{TelemetryConfig, RECOVERY_REQUESTS, TRANSACTIONS_EXECUTED};
    use shared_bus::InMemoryEventBus;
    use shared_types::entities::{Address, U256};
    use tokio::sync::watch;

    use crate::fixtures::{GENESIS, USER1, USER2};

    const WALLET: Address = Address::new([0xAA; 20]);
    const RECOVERER: Address = Address::new([0x5C; 20]);

    fn config() -> RuntimeConfig {
        RuntimeConfig {
            avatar: WALLET,
            owner: WALLET,
            recovery_owner: RECOVERER,
            cooldown: 180,
            expiration: 180_000,
            factory: DEFAULT_MODULE_FACTORY,
            delay_master_copy: Address::repeat_byte(0xD1),
            swap_master_copy: Address::repeat_byte(0xD2),
            telemetry: TelemetryConfig::default(),
        }
    }

    #[test]
    fn test_planned_identities_match_running_components() {
        let clock = Arc::new(ManualTimeSource::new(GENESIS));
        let container =
            GuardContainer::new(config(), clock, vec![USER1], Arc::new(InMemoryEventBus::new()))
                .unwrap();

        let planned = container
            .planner
            .recovery_batch(USER1, USER2, container.module(), container.guard())
            .unwrap();
        assert_eq!(planned.start[0].to, container.module());
        assert_eq!(planned.execute.to, container.guard());

        let status = container.delay.status(container.guard()).unwrap();
        assert_eq!(status.avatar, WALLET);
        assert_eq!(status.modules, vec![container.module()]);
    }

    #[test]
    fn test_setup_batch_proposes_from_recovery_owner() {
        let clock = Arc::new(ManualTimeSource::new(GENESIS));
        let container =
            GuardContainer::new(config(), clock, vec![USER1], Arc::new(InMemoryEventBus::new()))
                .unwrap();
        let submitter = RecordingProposalSubmitter::new();

        let hash = propose(WALLET, container.setup.transactions.clone(), RECOVERER, &submitter)
            .unwrap();
        let proposals = submitter.proposals();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].hash, hash);
        assert_eq!(proposals[0].transactions.len(), 4);
    }

    #[tokio::test]
    async fn test_simulation_feeds_metrics_through_the_bus() {
        guard_telemetry::register_metrics().unwrap();
        let executed_before = TRANSACTIONS_EXECUTED.get();
        let recoveries_before = RECOVERY_REQUESTS.get();

        let clock = Arc::new(ManualTimeSource::new(GENESIS));
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = MetricsHandler::new(bus.as_ref());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(handler.run(shutdown_rx));

        let container = GuardContainer::new(config(), clock.clone(), vec![USER1], bus).unwrap();
        let report = run_simulation(
            &container,
            &clock,
            SimulationParams {
                old_owner: USER1,
                new_owner: USER2,
                extra_wait: 0,
            },
        );
        shutdown_tx.send(true).unwrap();
        let recorded = task.await.unwrap();

        assert!(report.swapped());
        assert!(matches!(report.steps.last().unwrap().result, StepResult::Ok { .. }));
        // DelaySetup, SwapOwnerSetup, ModuleEnabled, TransactionAdded,
        // RecoveryQueued, TransactionExecuted
        assert_eq!(recorded, 6);
        assert!(TRANSACTIONS_EXECUTED.get() >= executed_before + 1.0);
        assert!(RECOVERY_REQUESTS.get() >= recoveries_before + 1.0);
        assert!(guard_telemetry::encode_metrics()
            .unwrap()
            .contains("dg_delay_transactions_executed_total"));
    }

    #[test]
    fn test_recovery_owner_transfer_is_respected_by_the_container() {
        let clock = Arc::new(ManualTimeSource::new(GENESIS));
        let container =
            GuardContainer::new(config(), clock, vec![USER1], Arc::new(InMemoryEventBus::new()))
                .unwrap();

        container.recovery.transfer_ownership(RECOVERER, USER2).unwrap();
        assert!(container
            .recovery
            .start_recovery(RECOVERER, Address::SENTINEL, USER1, USER2)
            .is_err());
        assert_eq!(
            container
                .recovery
                .start_recovery(USER2, Address::SENTINEL, USER1, USER2),
            Ok(0)
        );
    }

    #[test]
    fn test_distinct_salts_give_distinct_guards() {
        let planner = GuardContainer::new(
            config(),
            Arc::new(ManualTimeSource::new(GENESIS)),
            Vec::new(),
            Arc::new(InMemoryEventBus::new()),
        )
        .unwrap()
        .planner;
        let a = planner.setup_batch(U256::from(0), U256::from(1)).unwrap();
        let b = planner.setup_batch(U256::from(7), U256::from(1)).unwrap();
        assert_ne!(a.delay, b.delay);
    }
}
