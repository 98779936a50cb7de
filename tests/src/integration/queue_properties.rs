//! # Queue Properties
//!
//! Cursor monotonicity, the module gate, and the cooldown and expiration
//! boundaries, exercised through the public delay API.
//!
//! The execution window is inclusive at both ends: a slot queued at `t` with
//! cooldown `c` and expiration `e` runs anywhere in `[t + c, t + c + e]`.

#[cfg(test)]
mod tests {
    use dg_01_delay::prelude::*;
    use dg_02_swap_owner::SwapOwnerApi;
    use proptest::prelude::*;
    use shared_types::entities::{Address, Bytes, MetaTransaction, Operation, U256};

    use crate::fixtures::*;

    // =========================================================================
    // MONOTONIC CURSOR
    // =========================================================================

    #[derive(Clone, Debug)]
    enum Op {
        Enqueue(u8),
        Wait(u64),
        Execute,
        SkipExpired,
        Revert,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Enqueue),
            (0u64..400).prop_map(Op::Wait),
            Just(Op::Execute),
            Just(Op::SkipExpired),
            Just(Op::Revert),
        ]
    }

    proptest! {
        #[test]
        fn prop_cursor_never_decreases_or_overtakes_queue(ops in prop::collection::vec(op(), 1..40)) {
            let world = World::new(60, 120);
            world.enable(MODULE);
            let mut last_cursor = 0;

            for op in ops {
                match op {
                    Op::Enqueue(tag) => { let _ = world.delay.enqueue(GUARD, MODULE, noop(tag)); }
                    Op::Wait(seconds) => world.clock.advance(seconds),
                    Op::Execute => { let _ = world.delay.execute(GUARD, AVATAR); }
                    Op::SkipExpired => { let _ = world.delay.skip_expired(GUARD, OWNER); }
                    Op::Revert => {
                        world.wallet.fail_next("forced");
                        let _ = world.delay.execute(GUARD, AVATAR);
                    }
                }

                let cursor = world.delay.tx_nonce(GUARD).unwrap();
                let queue = world.delay.queue_nonce(GUARD).unwrap();
                prop_assert!(cursor >= last_cursor);
                prop_assert!(cursor <= queue);
                last_cursor = cursor;
            }
        }
    }

    // =========================================================================
    // NO BYPASS
    // =========================================================================

    fn payload() -> impl Strategy<Value = MetaTransaction> {
        (
            any::<[u8; 20]>(),
            any::<u64>(),
            prop::collection::vec(any::<u8>(), 0..96),
            any::<bool>(),
        )
            .prop_map(|(to, value, data, delegate)| MetaTransaction {
                to: Address::new(to),
                value: U256::from(value),
                data: Bytes::from(data),
                operation: if delegate { Operation::DelegateCall } else { Operation::Call },
            })
    }

    proptest! {
        #[test]
        fn prop_never_enabled_identity_cannot_enqueue(caller in any::<[u8; 20]>(), tx in payload()) {
            let world = World::new(180, 0);
            world.enable(MODULE);
            let caller = Address::new(caller);
            prop_assume!(caller != MODULE);

            let result = world.delay.enqueue(GUARD, caller, tx);
            prop_assert!(
                matches!(result, Err(DelayError::ModuleNotEnabled { .. } | DelayError::Unauthorized { .. })),
                "unexpected result {:?}",
                result
            );
            prop_assert_eq!(world.delay.queue_nonce(GUARD).unwrap(), 0);
        }
    }

    #[test]
    fn test_disabled_module_loses_access() {
        let world = World::new(180, 0);
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.delay.disable_module(GUARD, AVATAR, MODULE).unwrap();

        assert_eq!(
            world.delay.enqueue(GUARD, MODULE, noop(2)),
            Err(DelayError::ModuleNotEnabled { module: MODULE })
        );
        // Slots queued while enabled stay valid.
        world.clock.advance(180);
        assert!(world.delay.execute(GUARD, AVATAR).is_ok());
    }

    // =========================================================================
    // COOLDOWN BOUNDARY
    // =========================================================================

    #[test]
    fn test_cooldown_boundary() {
        let world = World::new(180, 180_000);
        world.enable(MODULE);
        let queued_at = world.now();
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();

        world.clock.set(queued_at + 179);
        assert_eq!(
            world.delay.execute(GUARD, AVATAR),
            Err(DelayError::CooldownNotElapsed {
                nonce: 0,
                ready_at: queued_at + 180
            })
        );

        world.clock.set(queued_at + 180);
        let outcome = world.delay.execute(GUARD, AVATAR).unwrap();
        assert_eq!(outcome.nonce, 0);
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 1);
    }

    // =========================================================================
    // NO-EXPIRATION PERMANENCE
    // =========================================================================

    #[test]
    fn test_zero_expiration_never_expires() {
        let world = World::new(180, 0);
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();

        world.clock.advance(10 * 365 * 24 * 60 * 60);
        assert_eq!(world.delay.slot_state(GUARD, 0).unwrap(), Some(SlotState::Executable));
        assert!(!world.delay.skip_expired(GUARD, OWNER).unwrap());
        assert!(world.delay.execute(GUARD, AVATAR).is_ok());
    }

    // =========================================================================
    // EXPIRATION BOUNDARY
    // =========================================================================

    #[test]
    fn test_expiration_boundary_is_inclusive() {
        let world = World::new(180, 180);
        world.enable(SWAP);
        let module = world.swap_module();
        let queued_at = world.now();
        module
            .start_recovery(OWNER, Address::SENTINEL, USER1, USER2)
            .unwrap();

        world.clock.set(queued_at + 360);
        assert!(world.delay.execute(GUARD, AVATAR).is_ok());
        assert_eq!(world.wallet.owners(), vec![USER2]);

        world.clock.set(queued_at + 361);
        let nonce = module
            .start_recovery(OWNER, Address::SENTINEL, USER2, USER1)
            .unwrap();
        assert_eq!(nonce, 1);
        assert_eq!(world.delay.tx_created_at(GUARD, 1).unwrap(), Some(queued_at + 361));
    }

    #[test]
    fn test_one_second_past_the_window_expires() {
        let world = World::new(180, 180);
        world.enable(MODULE);
        let queued_at = world.now();
        let queued = world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();

        world.clock.set(queued_at + 361);
        assert_eq!(world.delay.slot_state(GUARD, queued).unwrap(), Some(SlotState::Expired));
        assert_eq!(
            world.delay.execute(GUARD, AVATAR),
            Err(DelayError::TransactionExpired {
                nonce: 0,
                deadline: queued_at + 360
            })
        );
        // The expired head was skipped on the way out.
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 1);
        assert!(world.wallet.calls().is_empty());
    }
}
