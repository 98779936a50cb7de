//! # Recovery Flow
//!
//! The swap-owner module proposing into the delay queue, and the wallet
//! carrying the swap out once the cooldown has passed.
//!
//! ```text
//! OWNER ──startRecovery──→ SWAP ──enqueue──→ GUARD ──execute──→ AVATAR.swapOwner
//! ```

#[cfg(test)]
mod tests {
    use dg_01_delay::prelude::*;
    use dg_02_swap_owner::{RecoveryRequest, SwapOwnerApi, SwapOwnerError};
    use dg_03_recovery_orchestrator::{start_recovery_tx, swap_owner_data};
    use shared_bus::{EventFilter, EventTopic, GuardEvent};
    use shared_types::entities::{Address, MetaTransaction};

    use crate::fixtures::*;

    // =========================================================================
    // SCENARIO A: EXECUTE BEFORE COOLDOWN
    // =========================================================================

    #[test]
    fn test_execute_before_cooldown_is_refused() {
        let world = World::new(180, 180_000);
        world.enable(MODULE);

        assert_eq!(world.delay.enqueue(GUARD, MODULE, noop(1)), Ok(0));
        assert!(matches!(
            world.delay.execute(GUARD, AVATAR),
            Err(DelayError::CooldownNotElapsed { nonce: 0, .. })
        ));
    }

    // =========================================================================
    // SCENARIO B: REPEATED EARLY EXECUTE LEAVES THE HEAD ALONE
    // =========================================================================

    #[test]
    fn test_repeated_early_execute_keeps_head() {
        let world = World::new(180, 180_000);
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();

        for _ in 0..2 {
            assert!(matches!(
                world.delay.execute(GUARD, AVATAR),
                Err(DelayError::CooldownNotElapsed { nonce: 0, .. })
            ));
            world.clock.advance(60);
        }
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 0);
        assert_eq!(world.delay.slot_state(GUARD, 0).unwrap(), Some(SlotState::Queued));
    }

    // =========================================================================
    // SCENARIO C: OTHER MODULES DO NOT BLOCK THE RECOVERY MODULE
    // =========================================================================

    #[test]
    fn test_unrelated_module_traffic_does_not_block_recovery() {
        let world = World::new(180, 180_000);
        world.enable(MODULE);
        world.enable(SWAP);
        let recovery = world.swap_module();

        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.clock.advance(180);
        world.delay.execute(GUARD, AVATAR).unwrap();

        // A second unrelated slot is still cooling down when the recovery starts.
        world.delay.enqueue(GUARD, MODULE, noop(2)).unwrap();
        let nonce = recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();
        assert_eq!(nonce, 2);

        world.clock.advance(180);
        world.delay.execute(GUARD, AVATAR).unwrap();
        world.delay.execute(GUARD, AVATAR).unwrap();
        assert_eq!(world.wallet.owners(), vec![USER2]);
    }

    // =========================================================================
    // SCENARIO D: EXECUTABLE REQUEST BLOCKS A NEW ONE
    // =========================================================================

    #[test]
    fn test_executable_request_blocks_resubmission() {
        let world = World::new(180, 0);
        world.enable(SWAP);
        let recovery = world.swap_module();
        recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();

        world.clock.advance(180);
        assert_eq!(world.delay.slot_state(GUARD, 0).unwrap(), Some(SlotState::Executable));
        let err = recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, STRANGER)
            .unwrap_err();
        assert_eq!(err, SwapOwnerError::AlreadyExecutable { nonce: 0 });
        assert!(err.to_string().starts_with("a recovery is pending execution"));
        assert_eq!(world.delay.queue_nonce(GUARD).unwrap(), 1);
    }

    // =========================================================================
    // END TO END
    // =========================================================================

    #[test]
    fn test_full_recovery_with_expected_payload() {
        let world = World::new(180, 180_000);
        world.enable(SWAP);
        let recovery = world.swap_module();
        let mut events = world.bus.subscribe(EventFilter::from_emitters(vec![GUARD, SWAP]));

        recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();

        // The planner's payload is exactly what the module queued.
        let planned = start_recovery_tx(USER1, USER2, SWAP);
        let queued = world.delay.transaction(GUARD, 0).unwrap().unwrap();
        assert_eq!(queued.tx.data, planned.encoded);
        assert_eq!(queued.tx.to, AVATAR);

        world.clock.advance(180);
        let expected = MetaTransaction::call(AVATAR, planned.encoded.clone());
        let outcome = world.delay.execute_next(GUARD, AVATAR, &expected).unwrap();
        assert_eq!(outcome.tx_hash, queued.tx_hash);
        assert_eq!(world.wallet.owners(), vec![USER2]);

        let kinds: Vec<_> = events
            .drain()
            .into_iter()
            .map(|event| match event {
                GuardEvent::TransactionAdded { .. } => "added",
                GuardEvent::RecoveryQueued { .. } => "recovery",
                GuardEvent::TransactionExecuted { .. } => "executed",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["added", "recovery", "executed"]);
    }

    #[test]
    fn test_execute_next_refuses_a_different_payload() {
        let world = World::new(180, 180_000);
        world.enable(SWAP);
        let recovery = world.swap_module();
        recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();
        world.clock.advance(180);

        let forged = MetaTransaction::call(AVATAR, swap_owner_data(Address::SENTINEL, USER1, STRANGER));
        assert!(matches!(
            world.delay.execute_next(GUARD, AVATAR, &forged),
            Err(DelayError::TransactionHashMismatch { nonce: 0, .. })
        ));
        assert_eq!(world.wallet.owners(), vec![USER1]);
    }

    #[test]
    fn test_reverted_swap_keeps_request_for_retry() {
        let world = World::new(180, 180_000);
        world.enable(SWAP);
        let recovery = world.swap_module();
        recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();
        world.clock.advance(180);

        world.wallet.fail_next("out of gas");
        assert!(matches!(
            world.delay.execute(GUARD, AVATAR),
            Err(DelayError::ExecutionReverted { nonce: 0, .. })
        ));
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 0);

        world.delay.execute(GUARD, AVATAR).unwrap();
        assert_eq!(world.wallet.owners(), vec![USER2]);
    }

    #[test]
    fn test_live_recovery_is_never_discarded() {
        let world = World::new(180, 600);
        world.enable(SWAP);
        let recovery = world.swap_module();
        let mut delay_events = world.bus.subscribe(EventFilter::topics(vec![EventTopic::Delay]));
        recovery
            .start_recovery(OWNER, Address::SENTINEL, USER1, STRANGER)
            .unwrap();

        // Neither during the cooldown nor inside the window can the owner drop it.
        assert_eq!(world.delay.skip_expired(GUARD, OWNER), Ok(false));
        world.clock.advance(180 + 600);
        assert_eq!(world.delay.skip_expired(GUARD, OWNER), Ok(false));
        assert_eq!(world.delay.slot_state(GUARD, 0).unwrap(), Some(SlotState::Executable));

        // Only the closed window resolves it without running.
        world.clock.advance(1);
        assert_eq!(world.delay.skip_expired(GUARD, OWNER), Ok(true));
        assert_eq!(world.delay.slot_state(GUARD, 0).unwrap(), Some(SlotState::Expired));
        assert!(delay_events
            .drain()
            .iter()
            .any(|event| matches!(event, GuardEvent::TransactionExpired { nonce: 0, .. })));
        assert_eq!(world.delay.execute(GUARD, AVATAR), Err(DelayError::NothingQueued));
        assert_eq!(world.wallet.owners(), vec![USER1]);

        // An expired request no longer blocks the module.
        assert_eq!(
            recovery.start_recovery(OWNER, Address::SENTINEL, USER1, USER2),
            Ok(1)
        );
    }

    #[test]
    fn test_request_round_trips_through_queue() {
        let world = World::new(180, 0);
        world.enable(SWAP);
        world
            .swap_module()
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();

        let slot = world.delay.transaction(GUARD, 0).unwrap().unwrap();
        let request = RecoveryRequest::decode(&slot.tx).unwrap();
        assert_eq!(request.prev_owner, Address::SENTINEL);
        assert_eq!(request.old_owner, USER1);
        assert_eq!(request.new_owner, USER2);
        assert_eq!(slot.module, SWAP);
    }
}
