//! # Domain Entities
//!
//! Batches handed to the proposal boundary and the plans that produce them.

use serde::{Deserialize, Serialize};
use shared_types::encoding::{encode_tokens, keccak256, AbiToken};
use shared_types::entities::{Address, Bytes, Hash, SafeTransaction, Seconds, U256};

/// Zodiac module proxy factory used when none is configured.
pub const DEFAULT_MODULE_FACTORY: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xad, 0xdb, 0x49, 0x79, 0x5b, 0x0f, 0x9b, 0xa5, 0xbc, 0x29,
    0x8c, 0xdd, 0xa2, 0x36,
]);

/// Identities and policy needed to protect one wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Module proxy factory.
    pub factory: Address,
    /// Delay guard implementation the proxy points at.
    pub delay_master_copy: Address,
    /// Swap-owner module implementation the proxy points at.
    pub swap_master_copy: Address,
    /// Wallet being protected (owner, avatar and target of the guard).
    pub wallet: Address,
    /// Account allowed to start recoveries.
    pub recovery_owner: Address,
    /// Guard cooldown.
    pub cooldown: Seconds,
    /// Guard expiration (0 = never).
    pub expiration: Seconds,
}

/// A batch of wallet calls signed as one proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Wallet the batch is proposed to.
    pub safe: Address,
    /// Account proposing it.
    pub sender: Address,
    /// Calls, executed in order.
    pub transactions: Vec<SafeTransaction>,
    /// Digest identifying the batch.
    pub hash: Hash,
}

impl Proposal {
    /// Builds a proposal and its digest.
    #[must_use]
    pub fn new(safe: Address, sender: Address, transactions: Vec<SafeTransaction>) -> Self {
        let hash = batch_hash(safe, &transactions);
        Self {
            safe,
            sender,
            transactions,
            hash,
        }
    }
}

/// `keccak256(abi.encode(safe, n, (to, value, keccak256(data))...))`.
#[must_use]
pub fn batch_hash(safe: Address, transactions: &[SafeTransaction]) -> Hash {
    let mut tokens = vec![
        AbiToken::Address(safe),
        AbiToken::Uint(U256::from(transactions.len())),
    ];
    for tx in transactions {
        tokens.push(AbiToken::Address(tx.to));
        tokens.push(AbiToken::Uint(tx.value));
        tokens.push(AbiToken::FixedBytes(keccak256(tx.data.as_slice())));
    }
    keccak256(&encode_tokens(&tokens))
}

/// Result of planning the one-off setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupPlan {
    /// Predicted delay guard identity.
    pub delay: Address,
    /// Predicted swap-owner module identity.
    pub swap: Address,
    /// Deploy delay, deploy swap, enable delay on the wallet, enable swap on the delay.
    pub transactions: Vec<SafeTransaction>,
}

/// Result of planning a recovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPlan {
    /// Calls proposed now: `startRecovery` on the swap module.
    pub start: Vec<SafeTransaction>,
    /// Call proposed once the cooldown has elapsed: `executeNextTx` on the guard.
    pub execute: SafeTransaction,
    /// `swapOwner` payload the guard will carry out.
    pub encoded: Bytes,
}
