//! # Metrics Handler
//!
//! Feeds the Prometheus registry from the event bus. Components never touch
//! metrics directly: every counter here moves because an event said so.

use guard_telemetry::{
    GUARDS_CREATED, MODULES_ENABLED, OWNERSHIP_TRANSFERS, QUEUE_DEPTH, RECOVERY_REQUESTS,
    TRANSACTIONS_EXECUTED, TRANSACTIONS_EXPIRED, TRANSACTIONS_QUEUED,
};
use shared_bus::{EventFilter, EventSubscriber, GuardEvent, Subscription};
use tokio::sync::watch;
use tracing::{debug, info};

/// Subscriber translating guard events into metrics.
pub struct MetricsHandler {
    subscription: Subscription,
    recorded: u64,
}

impl MetricsHandler {
    /// Subscribes to every event on `bus`.
    #[must_use]
    pub fn new(bus: &dyn EventSubscriber) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::all()),
            recorded: 0,
        }
    }

    /// Run until the bus closes or `shutdown` flips to true, then drain.
    ///
    /// Returns the number of events recorded.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!("Metrics handler started");
        loop {
            tokio::select! {
                event = self.subscription.recv() => match event {
                    Some(event) => self.handle(&event),
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        self.drain();
        info!(recorded = self.recorded, "Metrics handler stopped");
        self.recorded
    }

    /// Record every buffered event without waiting.
    pub fn drain(&mut self) -> usize {
        let events = self.subscription.drain();
        for event in &events {
            self.handle(event);
        }
        events.len()
    }

    fn handle(&mut self, event: &GuardEvent) {
        debug!(topic = ?event.topic(), emitter = %event.emitter(), "Recording event");
        record(event);
        self.recorded += 1;
    }
}

/// Apply one event to the registry.
pub fn record(event: &GuardEvent) {
    match event {
        GuardEvent::DelaySetup { .. } => GUARDS_CREATED.inc(),
        GuardEvent::TransactionAdded { .. } => {
            TRANSACTIONS_QUEUED.inc();
            QUEUE_DEPTH.inc();
        }
        GuardEvent::TransactionExecuted { .. } => {
            TRANSACTIONS_EXECUTED.inc();
            QUEUE_DEPTH.dec();
        }
        GuardEvent::TransactionExpired { .. } => {
            TRANSACTIONS_EXPIRED.inc();
            QUEUE_DEPTH.dec();
        }
        GuardEvent::ModuleEnabled { .. } => MODULES_ENABLED.inc(),
        GuardEvent::ModuleDisabled { .. } => MODULES_ENABLED.dec(),
        GuardEvent::RecoveryQueued { .. } => RECOVERY_REQUESTS.inc(),
        GuardEvent::OwnershipTransferred { .. } => OWNERSHIP_TRANSFERS.inc(),
        GuardEvent::CooldownSet { .. }
        | GuardEvent::ExpirationSet { .. }
        | GuardEvent::SwapOwnerSetup { .. } => {}
    }
}
