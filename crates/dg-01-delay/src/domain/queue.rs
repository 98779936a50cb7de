//! # Transaction Queue - Append-Only, Singly-Advancing
//!
//! ## Data Structures
//!
//! - `slots`: every slot ever appended, indexed by nonce
//! - `tx_nonce`: execution cursor, index of the next slot eligible to run
//! - `in_flight`: head slot currently handed to the avatar, if any
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: `tx_nonce <= queue_nonce` (cursor moves one resolved slot at a time)
//! - INVARIANT-2: slots below the cursor are never read for execution again
//! - INVARIANT-3: the head runs only inside `[created + cooldown, created + cooldown + expiration]`
//!
//! The queue knows nothing about callers. Authorization lives in the guard.

use shared_types::encoding::transaction_hash;
use shared_types::entities::{Address, Hash, MetaTransaction, Timestamp};

use super::entities::{DelayConfig, QueuedTransaction, Resolution, SlotState};
use super::errors::DelayError;

/// Per-guard queue of delayed calls.
#[derive(Debug, Clone, Default)]
pub struct TransactionQueue {
    slots: Vec<QueuedTransaction>,
    tx_nonce: u64,
    in_flight: Option<u64>,
}

/// The head slot after it passed every timing check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedSlot {
    /// Slot index.
    pub nonce: u64,
    /// The call to carry out.
    pub tx: MetaTransaction,
    /// Hash of the call.
    pub tx_hash: Hash,
}

impl TransactionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next appended slot will get.
    #[must_use]
    pub fn queue_nonce(&self) -> u64 {
        self.slots.len() as u64
    }

    /// Execution cursor.
    #[must_use]
    pub fn tx_nonce(&self) -> u64 {
        self.tx_nonce
    }

    /// Slot currently being executed, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Number of slots at or above the cursor.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.queue_nonce() - self.tx_nonce
    }

    /// Slot at `nonce`.
    #[must_use]
    pub fn get(&self, nonce: u64) -> Option<&QueuedTransaction> {
        usize::try_from(nonce).ok().and_then(|i| self.slots.get(i))
    }

    /// Slot at the cursor.
    #[must_use]
    pub fn head(&self) -> Option<&QueuedTransaction> {
        self.get(self.tx_nonce)
    }

    /// Appends a slot stamped with `now` and returns its index.
    pub fn push(&mut self, module: Address, tx: MetaTransaction, now: Timestamp) -> &QueuedTransaction {
        let nonce = self.queue_nonce();
        let tx_hash = transaction_hash(&tx);
        self.slots.push(QueuedTransaction {
            nonce,
            tx,
            tx_hash,
            module,
            created_at: now,
            resolution: None,
        });
        &self.slots[self.slots.len() - 1]
    }

    /// Lifecycle state of slot `nonce` under `config` at `now`.
    #[must_use]
    pub fn slot_state(&self, nonce: u64, config: &DelayConfig, now: Timestamp) -> Option<SlotState> {
        let slot = self.get(nonce)?;
        if let Some(resolution) = slot.resolution {
            return Some(resolution.into());
        }
        Some(if config.in_cooldown(slot.created_at, now) {
            SlotState::Queued
        } else if config.is_expired(slot.created_at, now) {
            SlotState::Expired
        } else {
            SlotState::Executable
        })
    }

    fn ensure_idle(&self) -> Result<(), DelayError> {
        match self.in_flight {
            Some(nonce) => Err(DelayError::ExecutionInProgress { nonce }),
            None => Ok(()),
        }
    }

    /// Runs every timing check on the head and marks it in flight.
    ///
    /// When `expected` is given, the head must hash to the same value.
    /// An expired head is resolved as `Expired`, the cursor moves past it and
    /// `TransactionExpired` is returned. Every other failure leaves the queue
    /// unchanged.
    pub fn claim_head(
        &mut self,
        config: &DelayConfig,
        now: Timestamp,
        expected: Option<&MetaTransaction>,
    ) -> Result<ClaimedSlot, DelayError> {
        self.ensure_idle()?;
        let nonce = self.tx_nonce;
        let head = self.head().ok_or(DelayError::NothingQueued)?;

        if let Some(expected) = expected {
            let supplied = transaction_hash(expected);
            if supplied != head.tx_hash {
                return Err(DelayError::TransactionHashMismatch {
                    nonce,
                    queued: head.tx_hash,
                    supplied,
                });
            }
        }

        if config.in_cooldown(head.created_at, now) {
            return Err(DelayError::CooldownNotElapsed {
                nonce,
                ready_at: config.ready_at(head.created_at),
            });
        }

        if let Some(deadline) = config.deadline(head.created_at) {
            if now > deadline {
                self.resolve_head(Resolution::Expired);
                return Err(DelayError::TransactionExpired { nonce, deadline });
            }
        }

        let claimed = ClaimedSlot {
            nonce,
            tx: head.tx.clone(),
            tx_hash: head.tx_hash,
        };
        self.in_flight = Some(nonce);
        Ok(claimed)
    }

    /// Marks the claimed head executed and advances the cursor.
    pub fn complete(&mut self, nonce: u64) {
        if self.in_flight == Some(nonce) && self.tx_nonce == nonce {
            self.in_flight = None;
            self.resolve_head(Resolution::Executed);
        }
    }

    /// Releases the claim without advancing, so the head can be retried.
    pub fn release(&mut self, nonce: u64) {
        if self.in_flight == Some(nonce) {
            self.in_flight = None;
        }
    }

    /// Skips the head if its window has closed. Returns the skipped slot.
    pub fn skip_expired_head(
        &mut self,
        config: &DelayConfig,
        now: Timestamp,
    ) -> Result<Option<(u64, Hash)>, DelayError> {
        self.ensure_idle()?;
        let Some(head) = self.head() else {
            return Ok(None);
        };
        if !config.is_expired(head.created_at, now) {
            return Ok(None);
        }
        let skipped = (head.nonce, head.tx_hash);
        self.resolve_head(Resolution::Expired);
        Ok(Some(skipped))
    }

    fn resolve_head(&mut self, resolution: Resolution) {
        if let Some(slot) = usize::try_from(self.tx_nonce)
            .ok()
            .and_then(|i| self.slots.get_mut(i))
        {
            slot.resolution = Some(resolution);
            self.tx_nonce += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::entities::Bytes;

    const MODULE: Address = Address::new([0x11; 20]);

    fn tx(byte: u8) -> MetaTransaction {
        MetaTransaction::call(Address::repeat_byte(0xAA), Bytes::from(vec![byte]))
    }

    fn config(cooldown: u64, expiration: u64) -> DelayConfig {
        DelayConfig::new(cooldown, expiration).unwrap()
    }

    #[test]
    fn test_push_assigns_sequential_nonces() {
        let mut queue = TransactionQueue::new();
        assert_eq!(queue.push(MODULE, tx(1), 10).nonce, 0);
        assert_eq!(queue.push(MODULE, tx(2), 11).nonce, 1);
        assert_eq!(queue.queue_nonce(), 2);
        assert_eq!(queue.tx_nonce(), 0);
        assert_eq!(queue.pending(), 2);
        assert_eq!(queue.get(1).unwrap().created_at, 11);
    }

    #[test]
    fn test_claim_empty_queue() {
        let mut queue = TransactionQueue::new();
        assert_eq!(
            queue.claim_head(&config(180, 0), 0, None),
            Err(DelayError::NothingQueued)
        );
    }

    #[test]
    fn test_cooldown_boundary() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 1000);
        let cfg = config(180, 0);

        assert_eq!(
            queue.claim_head(&cfg, 1179, None),
            Err(DelayError::CooldownNotElapsed {
                nonce: 0,
                ready_at: 1180
            })
        );
        let claimed = queue.claim_head(&cfg, 1180, None).unwrap();
        assert_eq!(claimed.nonce, 0);
        assert_eq!(queue.in_flight(), Some(0));
    }

    #[test]
    fn test_complete_advances_cursor() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 0);
        let cfg = config(0, 0);

        let claimed = queue.claim_head(&cfg, 0, None).unwrap();
        queue.complete(claimed.nonce);

        assert_eq!(queue.tx_nonce(), 1);
        assert_eq!(queue.in_flight(), None);
        assert_eq!(queue.slot_state(0, &cfg, 0), Some(SlotState::Executed));
    }

    #[test]
    fn test_release_allows_retry() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 0);
        let cfg = config(0, 0);

        let claimed = queue.claim_head(&cfg, 0, None).unwrap();
        assert_eq!(
            queue.claim_head(&cfg, 0, None),
            Err(DelayError::ExecutionInProgress { nonce: 0 })
        );
        queue.release(claimed.nonce);
        assert_eq!(queue.tx_nonce(), 0);
        assert!(queue.claim_head(&cfg, 0, None).is_ok());
    }

    #[test]
    fn test_expired_head_is_skipped_and_reported() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 1000);
        queue.push(MODULE, tx(2), 1000);
        let cfg = config(180, 180);

        assert_eq!(
            queue.claim_head(&cfg, 1361, None),
            Err(DelayError::TransactionExpired {
                nonce: 0,
                deadline: 1360
            })
        );
        assert_eq!(queue.tx_nonce(), 1);
        assert_eq!(queue.slot_state(0, &cfg, 1361), Some(SlotState::Expired));
    }

    #[test]
    fn test_last_second_of_window_executes() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 1000);
        assert!(queue.claim_head(&config(180, 180), 1360, None).is_ok());
    }

    #[test]
    fn test_expected_payload_must_match() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 0);
        let cfg = config(0, 0);

        let err = queue.claim_head(&cfg, 0, Some(&tx(2))).unwrap_err();
        assert!(matches!(err, DelayError::TransactionHashMismatch { nonce: 0, .. }));
        assert_eq!(queue.in_flight(), None);
        assert!(queue.claim_head(&cfg, 0, Some(&tx(1))).is_ok());
    }

    #[test]
    fn test_skip_expired_head() {
        let mut queue = TransactionQueue::new();
        let cfg = config(10, 60);
        assert_eq!(queue.skip_expired_head(&cfg, 0), Ok(None));

        queue.push(MODULE, tx(1), 0);
        assert_eq!(queue.skip_expired_head(&cfg, 70), Ok(None));

        let skipped = queue.skip_expired_head(&cfg, 71).unwrap();
        assert_eq!(skipped.map(|(nonce, _)| nonce), Some(0));
        assert_eq!(queue.tx_nonce(), 1);
    }

    #[test]
    fn test_slots_below_cursor_are_resolved() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 0);
        queue.push(MODULE, tx(2), 0);
        let cfg = config(0, 60);

        let claimed = queue.claim_head(&cfg, 0, None).unwrap();
        queue.complete(claimed.nonce);
        assert!(queue.claim_head(&cfg, 61, None).is_err());

        assert_eq!(queue.tx_nonce(), 2);
        for nonce in 0..queue.tx_nonce() {
            assert!(queue.get(nonce).unwrap().resolution.is_some());
        }
        // A later, longer window does not revive a resolved slot.
        assert_eq!(queue.slot_state(1, &config(0, 0), 61), Some(SlotState::Expired));
    }

    #[test]
    fn test_policy_change_reevaluates_queued_slots() {
        let mut queue = TransactionQueue::new();
        queue.push(MODULE, tx(1), 0);

        assert_eq!(queue.slot_state(0, &config(100, 0), 50), Some(SlotState::Queued));
        assert_eq!(queue.slot_state(0, &config(10, 0), 50), Some(SlotState::Executable));
        assert_eq!(queue.slot_state(0, &config(10, 60), 71), Some(SlotState::Expired));
        assert_eq!(queue.slot_state(1, &config(10, 60), 71), None);
    }
}
