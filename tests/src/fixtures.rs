//! # Fixtures
//!
//! One wallet guarded by one delay guard, on a manual clock.

use std::sync::Arc;

use dg_01_delay::prelude::*;
use dg_02_swap_owner::{LocalDelayQueue, ModuleSetup, SwapOwnerModule};
use shared_bus::InMemoryEventBus;
use shared_types::entities::{Address, Bytes, MetaTransaction, Seconds, Timestamp};

/// Guard admin.
pub const OWNER: Address = Address::new([0x0A; 20]);
/// Protected wallet.
pub const AVATAR: Address = Address::new([0xAA; 20]);
/// Delay guard identity.
pub const GUARD: Address = Address::new([0xD0; 20]);
/// Swap-owner module identity.
pub const SWAP: Address = Address::new([0x5A; 20]);
/// A plain module that queues arbitrary calls.
pub const MODULE: Address = Address::new([0x33; 20]);
/// Initial wallet owner.
pub const USER1: Address = Address::new([0x01; 20]);
/// Replacement wallet owner.
pub const USER2: Address = Address::new([0x02; 20]);
/// Somebody with no role at all.
pub const STRANGER: Address = Address::new([0xEE; 20]);

/// Clock reading every world starts at.
pub const GENESIS: Timestamp = 1_700_000_000;

/// Wired components for one wallet.
pub struct World {
    pub clock: Arc<ManualTimeSource>,
    pub wallet: Arc<InMemoryAvatar>,
    pub bus: Arc<InMemoryEventBus>,
    pub delay: Arc<DelayService>,
}

impl World {
    /// A guard with the given policy over a wallet owned by `USER1`.
    pub fn new(cooldown: Seconds, expiration: Seconds) -> Self {
        Self::with_sink(cooldown, expiration, None)
    }

    /// Same as [`World::new`] with a custom execution sink in front of the wallet.
    pub fn with_sink(
        cooldown: Seconds,
        expiration: Seconds,
        sink: Option<Arc<dyn ExecutionSink>>,
    ) -> Self {
        let clock = Arc::new(ManualTimeSource::new(GENESIS));
        let wallet = Arc::new(InMemoryAvatar::new(AVATAR, vec![USER1]));
        let bus = Arc::new(InMemoryEventBus::new());
        let sink = sink.unwrap_or_else(|| wallet.clone() as Arc<dyn ExecutionSink>);
        let delay = Arc::new(DelayService::new(clock.clone(), sink, bus.clone()));
        let config = DelayConfig::new(cooldown, expiration).unwrap();
        delay
            .create_guard(OWNER, GuardSetup::for_avatar(GUARD, OWNER, AVATAR, config))
            .unwrap();
        Self {
            clock,
            wallet,
            bus,
            delay,
        }
    }

    /// Enables `module` on the guard as the avatar.
    pub fn enable(&self, module: Address) {
        self.delay.enable_module(GUARD, AVATAR, module).unwrap();
    }

    /// A swap-owner module owned by `OWNER`, targeting the guard.
    pub fn swap_module(&self) -> SwapOwnerModule {
        SwapOwnerModule::new(
            OWNER,
            ModuleSetup {
                module: SWAP,
                target: GUARD,
                avatar: AVATAR,
                owner: OWNER,
            },
            Arc::new(LocalDelayQueue::new(self.delay.clone())),
            self.bus.clone(),
        )
        .unwrap()
    }

    /// Current clock reading.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

/// A call to the wallet that changes nothing but is recorded.
pub fn noop(tag: u8) -> MetaTransaction {
    MetaTransaction::call(AVATAR, Bytes::from(vec![tag]))
}
