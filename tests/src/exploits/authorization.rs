//! # Authorization
//!
//! | Attack | Defense |
//! |--------|---------|
//! | Stranger reconfigures the guard | avatar-or-owner check on every admin call |
//! | Stranger executes or skips | same check on the execution path |
//! | Module enables another module | modules may only enqueue |
//! | Recovery started by a non-owner | module owner check before queueing |
//! | Shrinking expiration below the minimum | policy validation |

#[cfg(test)]
mod tests {
    use dg_01_delay::prelude::*;
    use dg_02_swap_owner::{SwapOwnerApi, SwapOwnerError};
    use shared_types::entities::Address;

    use crate::fixtures::*;

    fn unauthorized(caller: Address) -> DelayError {
        DelayError::Unauthorized { caller }
    }

    #[test]
    fn test_stranger_cannot_administer() {
        let world = World::new(180, 180_000);
        let d = &world.delay;

        assert_eq!(d.enable_module(GUARD, STRANGER, STRANGER), Err(unauthorized(STRANGER)));
        assert_eq!(d.disable_module(GUARD, STRANGER, MODULE), Err(unauthorized(STRANGER)));
        assert_eq!(d.set_cooldown(GUARD, STRANGER, 0), Err(unauthorized(STRANGER)));
        assert_eq!(d.set_expiration(GUARD, STRANGER, 0), Err(unauthorized(STRANGER)));
        assert_eq!(d.config(GUARD).unwrap(), DelayConfig::new(180, 180_000).unwrap());
    }

    #[test]
    fn test_stranger_cannot_execute_or_skip() {
        let world = World::new(180, 60);
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.clock.advance(180);

        assert_eq!(world.delay.execute(GUARD, STRANGER), Err(unauthorized(STRANGER)));
        world.clock.advance(61);
        assert_eq!(world.delay.skip_expired(GUARD, STRANGER), Err(unauthorized(STRANGER)));
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 0);
    }

    #[test]
    fn test_enabled_module_cannot_escalate() {
        let world = World::new(180, 0);
        world.enable(MODULE);

        assert_eq!(world.delay.enable_module(GUARD, MODULE, STRANGER), Err(unauthorized(MODULE)));
        assert_eq!(world.delay.set_cooldown(GUARD, MODULE, 0), Err(unauthorized(MODULE)));
        assert_eq!(world.delay.execute(GUARD, MODULE), Err(unauthorized(MODULE)));
    }

    #[test]
    fn test_zeroing_the_cooldown_only_through_the_owner() {
        let world = World::new(180, 0);
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();

        // The policy is read at evaluation time, so the owner can release
        // everything already queued.
        world.delay.set_cooldown(GUARD, OWNER, 0).unwrap();
        assert!(world.delay.execute(GUARD, AVATAR).is_ok());
    }

    #[test]
    fn test_expiration_below_minimum_is_refused() {
        let world = World::new(180, 0);
        assert!(matches!(
            world.delay.set_expiration(GUARD, OWNER, 59),
            Err(DelayError::InvalidConfiguration(_))
        ));
        assert!(world.delay.set_expiration(GUARD, OWNER, 60).is_ok());
    }

    #[test]
    fn test_sentinel_and_zero_modules_are_refused() {
        let world = World::new(180, 0);
        for module in [Address::ZERO, Address::SENTINEL] {
            assert_eq!(
                world.delay.enable_module(GUARD, AVATAR, module),
                Err(DelayError::InvalidModule { module })
            );
        }
        world.enable(MODULE);
        assert_eq!(
            world.delay.enable_module(GUARD, AVATAR, MODULE),
            Err(DelayError::ModuleAlreadyEnabled { module: MODULE })
        );
    }

    #[test]
    fn test_recovery_from_non_owner() {
        let world = World::new(180, 0);
        world.enable(SWAP);
        let recovery = world.swap_module();

        for caller in [STRANGER, AVATAR, USER1] {
            assert_eq!(
                recovery.start_recovery(caller, Address::SENTINEL, USER1, caller),
                Err(SwapOwnerError::NotOwner { account: caller })
            );
        }
        assert_eq!(world.delay.queue_nonce(GUARD).unwrap(), 0);
    }

    #[test]
    fn test_unknown_guard() {
        let world = World::new(180, 0);
        assert_eq!(
            world.delay.enqueue(STRANGER, MODULE, noop(1)),
            Err(DelayError::UnknownGuard(STRANGER))
        );
    }
}
