//! Adapter binding the recovery module to an in-process delay service.

use std::sync::Arc;

use dg_01_delay::{DelayApi, DelayError, SlotState};
use shared_types::entities::{Address, MetaTransaction};

use crate::ports::DelayQueuePort;

/// Forwards queue calls to a [`DelayApi`] implementation.
#[derive(Clone)]
pub struct LocalDelayQueue {
    delay: Arc<dyn DelayApi>,
}

impl LocalDelayQueue {
    /// Wraps `delay`.
    pub fn new(delay: Arc<dyn DelayApi>) -> Self {
        Self { delay }
    }
}

impl DelayQueuePort for LocalDelayQueue {
    fn enqueue(
        &self,
        guard: Address,
        module: Address,
        tx: MetaTransaction,
    ) -> Result<u64, DelayError> {
        self.delay.enqueue(guard, module, tx)
    }

    fn slot_state(&self, guard: Address, nonce: u64) -> Result<Option<SlotState>, DelayError> {
        self.delay.slot_state(guard, nonce)
    }
}
