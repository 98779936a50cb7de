//! # Re-entrancy
//!
//! The wallet calls back into the guard while the guard is executing one of
//! its slots. The head is held in flight for the duration of the call, so
//! nothing can move the cursor underneath it, while modules may still queue.
//! A wallet that unwinds out of the call leaves the head retryable.
//!
//! ```text
//! execute ──claim(n)──→ wallet.perform_call ──→ execute / skip  ✗ ExecutionInProgress
//!                                          └──→ enqueue                         ✓
//! ```

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, OnceLock, Weak};

    use dg_01_delay::prelude::*;
    use parking_lot::Mutex;
    use shared_types::entities::{Address, Bytes, MetaTransaction};

    use crate::fixtures::*;

    /// Results of the nested calls, in order.
    #[derive(Debug, Default)]
    struct Nested {
        execute: Option<Result<ExecutionOutcome, DelayError>>,
        skip: Option<Result<bool, DelayError>>,
        enqueue: Option<Result<u64, DelayError>>,
    }

    /// Forwards to the wallet after calling back into the guard once.
    struct ReentrantWallet {
        wallet: Arc<InMemoryAvatar>,
        delay: OnceLock<Weak<DelayService>>,
        nested: Mutex<Nested>,
        armed: Mutex<bool>,
    }

    impl ExecutionSink for ReentrantWallet {
        fn perform_call(&self, target: Address, tx: &MetaTransaction) -> Result<Bytes, CallReverted> {
            let fire = std::mem::replace(&mut *self.armed.lock(), false);
            if fire {
                if let Some(delay) = self.delay.get().and_then(Weak::upgrade) {
                    let mut nested = self.nested.lock();
                    nested.execute = Some(delay.execute(GUARD, AVATAR));
                    nested.skip = Some(delay.skip_expired(GUARD, AVATAR));
                    nested.enqueue = Some(delay.enqueue(GUARD, MODULE, noop(9)));
                }
            }
            self.wallet.perform_call(target, tx)
        }
    }

    fn reentrant_world() -> (World, Arc<ReentrantWallet>) {
        let wallet = Arc::new(InMemoryAvatar::new(AVATAR, vec![USER1]));
        let sink = Arc::new(ReentrantWallet {
            wallet: wallet.clone(),
            delay: OnceLock::new(),
            nested: Mutex::new(Nested::default()),
            armed: Mutex::new(true),
        });
        let mut world = World::with_sink(180, 0, Some(sink.clone()));
        world.wallet = wallet;
        sink.delay.set(Arc::downgrade(&world.delay)).unwrap();
        (world, sink)
    }

    #[test]
    fn test_nested_cursor_moves_are_refused() {
        let (world, sink) = reentrant_world();
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.delay.enqueue(GUARD, MODULE, noop(2)).unwrap();
        world.clock.advance(180);

        let outcome = world.delay.execute(GUARD, AVATAR).unwrap();
        assert_eq!(outcome.nonce, 0);

        let nested = sink.nested.lock();
        assert_eq!(nested.execute, Some(Err(DelayError::ExecutionInProgress { nonce: 0 })));
        assert_eq!(nested.skip, Some(Err(DelayError::ExecutionInProgress { nonce: 0 })));
        assert_eq!(nested.enqueue, Some(Ok(2)));

        // Exactly one slot ran, and the cursor moved by exactly one.
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 1);
        assert_eq!(world.wallet.calls().len(), 1);
    }

    #[test]
    fn test_guard_is_usable_after_nested_attempts() {
        let (world, _sink) = reentrant_world();
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.delay.enqueue(GUARD, MODULE, noop(2)).unwrap();
        world.clock.advance(180);

        world.delay.execute(GUARD, AVATAR).unwrap();
        world.delay.execute(GUARD, AVATAR).unwrap();
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 2);

        // The slot queued from inside the call still has to wait out its own cooldown.
        assert!(matches!(
            world.delay.execute(GUARD, AVATAR),
            Err(DelayError::CooldownNotElapsed { nonce: 2, .. })
        ));
    }

    #[test]
    fn test_double_execute_from_two_threads_runs_once() {
        let world = World::new(180, 0);
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.clock.advance(180);

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| world.delay.execute(GUARD, AVATAR)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().all(|r| matches!(
            r,
            Ok(_) | Err(DelayError::NothingQueued | DelayError::ExecutionInProgress { .. })
        )));
        assert_eq!(world.wallet.calls().len(), 1);
    }

    /// Unwinds out of its first call.
    struct CrashingWallet {
        wallet: Arc<InMemoryAvatar>,
        crashed: AtomicBool,
    }

    impl ExecutionSink for CrashingWallet {
        fn perform_call(&self, target: Address, tx: &MetaTransaction) -> Result<Bytes, CallReverted> {
            if !self.crashed.swap(true, Ordering::SeqCst) {
                panic!("wallet crashed");
            }
            self.wallet.perform_call(target, tx)
        }
    }

    #[test]
    fn test_crashing_wallet_does_not_wedge_the_queue() {
        let wallet = Arc::new(InMemoryAvatar::new(AVATAR, vec![USER1]));
        let sink = Arc::new(CrashingWallet {
            wallet: wallet.clone(),
            crashed: AtomicBool::new(false),
        });
        let mut world = World::with_sink(180, 0, Some(sink));
        world.wallet = wallet;
        world.enable(MODULE);
        world.delay.enqueue(GUARD, MODULE, noop(1)).unwrap();
        world.clock.advance(180);

        let crashed = panic::catch_unwind(AssertUnwindSafe(|| world.delay.execute(GUARD, AVATAR)));
        assert!(crashed.is_err());
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 0);
        assert_eq!(world.delay.skip_expired(GUARD, AVATAR), Ok(false));

        assert_eq!(world.delay.execute(GUARD, AVATAR).unwrap().nonce, 0);
        assert_eq!(world.delay.tx_nonce(GUARD).unwrap(), 1);
        assert_eq!(world.wallet.calls().len(), 1);
    }
}
