//! # Delay Service
//!
//! Hosts the guards of many avatars and wires the pure domain to the clock,
//! the execution sink and the event bus.
//!
//! ## Locking
//!
//! - The guard map is behind a `RwLock`; lookups take the read side.
//! - Each guard is behind its own `Mutex`. Every operation on one guard is
//!   serialized by it.
//! - The sink is called with no lock held. The head is marked in flight for
//!   the duration of the call, so the cursor cannot move underneath it.
//! - The in-flight mark is owned by an [`InFlight`] value. If the sink
//!   unwinds, dropping it releases the head.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use shared_bus::{EventPublisher, GuardEvent};
use shared_types::entities::{Address, Hash, MetaTransaction, Seconds, Timestamp};
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    DelayConfig, DelayError, DelayGuard, ExecutionOutcome, GuardSetup, GuardStatus,
    QueuedTransaction, SlotState,
};
use crate::ports::{DelayApi, ExecutionSink, TimeSource};

/// Counters kept by the service.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Guards created.
    pub guards_created: u64,
    /// Slots appended.
    pub transactions_queued: u64,
    /// Slots executed.
    pub transactions_executed: u64,
    /// Slots skipped on expiry.
    pub transactions_expired: u64,
    /// Calls rejected by the sink.
    pub executions_reverted: u64,
    /// Calls rejected by a guard check.
    pub rejected_requests: u64,
}

/// Claim on the head slot of one guard while the sink runs.
///
/// Dropped without [`InFlight::complete`], it releases the slot so the head
/// can be executed again.
struct InFlight<'a> {
    handle: &'a Mutex<DelayGuard>,
    guard: Address,
    nonce: u64,
    completed: bool,
}

impl InFlight<'_> {
    fn complete(mut self) {
        self.handle.lock().complete(self.nonce);
        self.completed = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        self.handle.lock().release(self.nonce);
        if std::thread::panicking() {
            warn!(guard = %self.guard, nonce = self.nonce, "Execution sink panicked, head released");
        }
    }
}

/// The delay component service.
pub struct DelayService {
    guards: RwLock<HashMap<Address, Arc<Mutex<DelayGuard>>>>,
    clock: Arc<dyn TimeSource>,
    sink: Arc<dyn ExecutionSink>,
    publisher: Arc<dyn EventPublisher>,
    stats: Mutex<ServiceStats>,
}

impl DelayService {
    /// Creates a service with no guards.
    pub fn new(
        clock: Arc<dyn TimeSource>,
        sink: Arc<dyn ExecutionSink>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            guards: RwLock::new(HashMap::new()),
            clock,
            sink,
            publisher,
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    /// Identities of every hosted guard.
    #[must_use]
    pub fn guard_addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.guards.read().keys().copied().collect();
        addresses.sort();
        addresses
    }

    /// Current time as seen by the guards.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn handle(&self, guard: Address) -> Result<Arc<Mutex<DelayGuard>>, DelayError> {
        self.guards
            .read()
            .get(&guard)
            .cloned()
            .ok_or(DelayError::UnknownGuard(guard))
    }

    fn read<T>(&self, guard: Address, f: impl FnOnce(&DelayGuard) -> T) -> Result<T, DelayError> {
        let handle = self.handle(guard)?;
        let state = handle.lock();
        Ok(f(&state))
    }

    fn rejected(&self, operation: &'static str, guard: Address, err: DelayError) -> DelayError {
        warn!(%guard, operation, reason = err.kind(), error = %err, "Request rejected");
        self.stats.lock().rejected_requests += 1;
        err
    }

    /// Runs an admin mutation under the guard's lock and publishes its event.
    fn administer(
        &self,
        operation: &'static str,
        guard: Address,
        f: impl FnOnce(&mut DelayGuard) -> Result<GuardEvent, DelayError>,
    ) -> Result<(), DelayError> {
        let handle = self.handle(guard)?;
        let mut state = handle.lock();
        let event = f(&mut state).map_err(|err| self.rejected(operation, guard, err))?;
        info!(%guard, operation, "Guard updated");
        self.publisher.publish(event);
        Ok(())
    }

    fn execute_head(
        &self,
        guard: Address,
        caller: Address,
        expected: Option<&MetaTransaction>,
    ) -> Result<ExecutionOutcome, DelayError> {
        let handle = self.handle(guard)?;
        let now = self.clock.now();

        let (claimed, target) = {
            let mut state = handle.lock();
            match state.claim_head(caller, now, expected) {
                Ok(claimed) => (claimed, state.target()),
                Err(err) => {
                    if let DelayError::TransactionExpired { nonce, deadline } = &err {
                        let tx_hash = state
                            .queue()
                            .get(*nonce)
                            .map(|slot| slot.tx_hash)
                            .unwrap_or_default();
                        info!(%guard, nonce, deadline, now, "Expired transaction skipped");
                        self.stats.lock().transactions_expired += 1;
                        self.publisher.publish(GuardEvent::TransactionExpired {
                            guard,
                            nonce: *nonce,
                            tx_hash,
                        });
                        return Err(err);
                    }
                    return Err(self.rejected("execute", guard, err));
                }
            }
        };

        let in_flight = InFlight {
            handle: &*handle,
            guard,
            nonce: claimed.nonce,
            completed: false,
        };
        debug!(%guard, nonce = claimed.nonce, %target, "Handing transaction to execution sink");

        match self.sink.perform_call(target, &claimed.tx) {
            Ok(return_data) => {
                in_flight.complete();
                self.stats.lock().transactions_executed += 1;
                info!(
                    %guard,
                    nonce = claimed.nonce,
                    tx_hash = %claimed.tx_hash,
                    "Transaction executed"
                );
                self.publisher.publish(GuardEvent::TransactionExecuted {
                    guard,
                    nonce: claimed.nonce,
                    tx_hash: claimed.tx_hash,
                });
                Ok(ExecutionOutcome {
                    nonce: claimed.nonce,
                    tx_hash: claimed.tx_hash,
                    return_data,
                })
            }
            Err(revert) => {
                drop(in_flight);
                self.stats.lock().executions_reverted += 1;
                warn!(
                    %guard,
                    nonce = claimed.nonce,
                    reason = %revert,
                    "Transaction reverted, head kept for retry"
                );
                Err(DelayError::ExecutionReverted {
                    nonce: claimed.nonce,
                    reason: revert.reason,
                })
            }
        }
    }
}

impl DelayApi for DelayService {
    #[instrument(skip(self, setup), fields(guard = %setup.guard))]
    fn create_guard(&self, initiator: Address, setup: GuardSetup) -> Result<(), DelayError> {
        let guard = setup.guard;
        let state = DelayGuard::new(setup).map_err(|err| self.rejected("create_guard", guard, err))?;

        let event = GuardEvent::DelaySetup {
            guard,
            initiator,
            owner: state.owner(),
            avatar: state.avatar(),
            target: state.target(),
        };
        {
            let mut guards = self.guards.write();
            if guards.contains_key(&guard) {
                return Err(self.rejected(
                    "create_guard",
                    guard,
                    DelayError::GuardAlreadyExists(guard),
                ));
            }
            guards.insert(guard, Arc::new(Mutex::new(state)));
        }

        self.stats.lock().guards_created += 1;
        info!(%guard, %initiator, "Delay guard created");
        self.publisher.publish(event);
        Ok(())
    }

    #[instrument(skip(self, tx), fields(guard = %guard, caller = %caller))]
    fn enqueue(
        &self,
        guard: Address,
        caller: Address,
        tx: MetaTransaction,
    ) -> Result<u64, DelayError> {
        let handle = self.handle(guard)?;
        let now = self.clock.now();
        let mut state = handle.lock();

        let slot = state
            .enqueue(caller, tx, now)
            .map_err(|err| self.rejected("enqueue", guard, err))?;

        self.stats.lock().transactions_queued += 1;
        info!(
            nonce = slot.nonce,
            tx_hash = %slot.tx_hash,
            to = %slot.tx.to,
            created_at = now,
            "Transaction queued"
        );
        self.publisher.publish(GuardEvent::TransactionAdded {
            guard,
            queue_nonce: slot.nonce,
            tx_hash: slot.tx_hash,
            to: slot.tx.to,
            value: slot.tx.value,
            data: slot.tx.data,
            operation: slot.tx.operation,
        });
        Ok(slot.nonce)
    }

    #[instrument(skip(self), fields(guard = %guard, caller = %caller))]
    fn execute(&self, guard: Address, caller: Address) -> Result<ExecutionOutcome, DelayError> {
        self.execute_head(guard, caller, None)
    }

    #[instrument(skip(self, expected), fields(guard = %guard, caller = %caller))]
    fn execute_next(
        &self,
        guard: Address,
        caller: Address,
        expected: &MetaTransaction,
    ) -> Result<ExecutionOutcome, DelayError> {
        self.execute_head(guard, caller, Some(expected))
    }

    #[instrument(skip(self), fields(guard = %guard, caller = %caller))]
    fn skip_expired(&self, guard: Address, caller: Address) -> Result<bool, DelayError> {
        let handle = self.handle(guard)?;
        let now = self.clock.now();
        let mut state = handle.lock();

        let skipped = state
            .skip_expired(caller, now)
            .map_err(|err| self.rejected("skip_expired", guard, err))?;

        match skipped {
            Some((nonce, tx_hash)) => {
                self.stats.lock().transactions_expired += 1;
                info!(nonce, now, "Expired transaction skipped");
                self.publisher.publish(GuardEvent::TransactionExpired {
                    guard,
                    nonce,
                    tx_hash,
                });
                Ok(true)
            }
            None => {
                debug!("Head is absent or not expired");
                Ok(false)
            }
        }
    }

    #[instrument(skip(self), fields(guard = %guard, caller = %caller))]
    fn set_cooldown(
        &self,
        guard: Address,
        caller: Address,
        cooldown: Seconds,
    ) -> Result<(), DelayError> {
        self.administer("set_cooldown", guard, |state| {
            state.set_cooldown(caller, cooldown)?;
            Ok(GuardEvent::CooldownSet { guard, cooldown })
        })
    }

    #[instrument(skip(self), fields(guard = %guard, caller = %caller))]
    fn set_expiration(
        &self,
        guard: Address,
        caller: Address,
        expiration: Seconds,
    ) -> Result<(), DelayError> {
        self.administer("set_expiration", guard, |state| {
            state.set_expiration(caller, expiration)?;
            Ok(GuardEvent::ExpirationSet { guard, expiration })
        })
    }

    #[instrument(skip(self), fields(guard = %guard, caller = %caller))]
    fn enable_module(
        &self,
        guard: Address,
        caller: Address,
        module: Address,
    ) -> Result<(), DelayError> {
        self.administer("enable_module", guard, |state| {
            state.enable_module(caller, module)?;
            Ok(GuardEvent::ModuleEnabled { guard, module })
        })
    }

    #[instrument(skip(self), fields(guard = %guard, caller = %caller))]
    fn disable_module(
        &self,
        guard: Address,
        caller: Address,
        module: Address,
    ) -> Result<(), DelayError> {
        self.administer("disable_module", guard, |state| {
            state.disable_module(caller, module)?;
            Ok(GuardEvent::ModuleDisabled { guard, module })
        })
    }

    fn is_module_enabled(&self, guard: Address, module: Address) -> Result<bool, DelayError> {
        self.read(guard, |state| state.registry().is_enabled(&module))
    }

    fn enabled_modules(&self, guard: Address) -> Result<Vec<Address>, DelayError> {
        self.read(guard, |state| state.registry().modules())
    }

    fn modules_paginated(
        &self,
        guard: Address,
        start: Address,
        page_size: usize,
    ) -> Result<(Vec<Address>, Option<Address>), DelayError> {
        self.read(guard, |state| state.registry().paginated(start, page_size))
    }

    fn queue_nonce(&self, guard: Address) -> Result<u64, DelayError> {
        self.read(guard, |state| state.queue().queue_nonce())
    }

    fn tx_nonce(&self, guard: Address) -> Result<u64, DelayError> {
        self.read(guard, |state| state.queue().tx_nonce())
    }

    fn tx_hash(&self, guard: Address, nonce: u64) -> Result<Option<Hash>, DelayError> {
        self.read(guard, |state| state.queue().get(nonce).map(|slot| slot.tx_hash))
    }

    fn tx_created_at(&self, guard: Address, nonce: u64) -> Result<Option<Timestamp>, DelayError> {
        self.read(guard, |state| state.queue().get(nonce).map(|slot| slot.created_at))
    }

    fn transaction(
        &self,
        guard: Address,
        nonce: u64,
    ) -> Result<Option<QueuedTransaction>, DelayError> {
        self.read(guard, |state| state.queue().get(nonce).cloned())
    }

    fn slot_state(&self, guard: Address, nonce: u64) -> Result<Option<SlotState>, DelayError> {
        let now = self.clock.now();
        let state = self.read(guard, |state| state.slot_state(nonce, now))?;
        debug!(%guard, nonce, now, state = ?state, "Slot state queried");
        Ok(state)
    }

    fn config(&self, guard: Address) -> Result<DelayConfig, DelayError> {
        self.read(guard, DelayGuard::config)
    }

    fn status(&self, guard: Address) -> Result<GuardStatus, DelayError> {
        self.read(guard, |state| GuardStatus {
            guard,
            avatar: state.avatar(),
            config: state.config(),
            queue_nonce: state.queue().queue_nonce(),
            tx_nonce: state.queue().tx_nonce(),
            modules: state.registry().modules(),
        })
    }
}
