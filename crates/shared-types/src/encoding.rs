//! # ABI Encoding
//!
//! Minimal Solidity ABI support for the handful of calls the guard builds:
//! function selectors, static words (address, uint) and one dynamic `bytes`
//! argument kind. The queue itself never looks inside call data; only the
//! recovery module, the orchestrator and the in-memory avatar do.
//!
//! ## Layout
//!
//! ```text
//! selector(4) | head(32 * n) | tail(dynamic args)
//! ```
//!
//! Dynamic arguments put their byte offset (relative to the start of the
//! head) in the head slot and `len || data || zero-padding` in the tail.

use sha3::{Digest, Keccak256};

use crate::entities::{Address, Hash, MetaTransaction, U256};
use crate::errors::EncodingError;

/// ABI word size.
pub const WORD: usize = 32;

/// Canonical signatures of the calls the guard builds or interprets.
pub mod signatures {
    /// Owner replacement on the protected wallet.
    pub const SWAP_OWNER: &str = "swapOwner(address,address,address)";
    /// Module enablement on a wallet or a delay guard.
    pub const ENABLE_MODULE: &str = "enableModule(address)";
    /// Recovery request on the owner-swap module.
    pub const START_RECOVERY: &str = "startRecovery(address,address,address)";
    /// Payload-checked execution of a delay guard's head slot.
    pub const EXECUTE_NEXT_TX: &str = "executeNextTx(address,uint256,bytes,uint8)";
    /// Proxy deployment on the module factory.
    pub const DEPLOY_MODULE: &str = "deployModule(address,bytes,uint256)";
    /// Module initialiser.
    pub const SET_UP: &str = "setUp(bytes)";
}

/// Computes Keccak-256.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Hash::new(out)
}

/// First four bytes of `keccak256(signature)`.
///
/// `signature` is the canonical form, e.g. `"swapOwner(address,address,address)"`.
#[must_use]
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// A single ABI argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiToken {
    /// `address`, left-padded to 32 bytes.
    Address(Address),
    /// `uint256`.
    Uint(U256),
    /// `uint8` (operation discriminators).
    Uint8(u8),
    /// `bytes32`.
    FixedBytes(Hash),
    /// `bytes`, dynamic.
    Bytes(Vec<u8>),
}

impl AbiToken {
    fn is_dynamic(&self) -> bool {
        matches!(self, Self::Bytes(_))
    }

    fn static_word(&self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        match self {
            Self::Address(addr) => word[12..].copy_from_slice(addr.as_bytes()),
            Self::Uint(value) => value.to_big_endian(&mut word),
            Self::Uint8(value) => word[WORD - 1] = *value,
            Self::FixedBytes(hash) => word.copy_from_slice(hash.as_bytes()),
            Self::Bytes(_) => {}
        }
        word
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn usize_word(value: usize) -> [u8; WORD] {
    AbiToken::Uint(U256::from(value)).static_word()
}

/// Encodes arguments without a selector (`abi.encode`).
#[must_use]
pub fn encode_tokens(tokens: &[AbiToken]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if let AbiToken::Bytes(data) = token {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&usize_word(data.len()));
            tail.extend_from_slice(data);
            tail.resize(tail.len() + padded_len(data.len()) - data.len(), 0);
        } else {
            debug_assert!(!token.is_dynamic());
            head.extend_from_slice(&token.static_word());
        }
    }

    head.extend_from_slice(&tail);
    head
}

/// Encodes a full call: `selector(signature) ++ abi.encode(tokens)`.
#[must_use]
pub fn encode_call(signature: &str, tokens: &[AbiToken]) -> Vec<u8> {
    let mut out = function_selector(signature).to_vec();
    out.extend_from_slice(&encode_tokens(tokens));
    out
}

/// Hash binding a queued call to its exact contents.
///
/// `keccak256(abi.encode(to, value, keccak256(data), operation))`
#[must_use]
pub fn transaction_hash(tx: &MetaTransaction) -> Hash {
    keccak256(&encode_tokens(&[
        AbiToken::Address(tx.to),
        AbiToken::Uint(tx.value),
        AbiToken::FixedBytes(keccak256(tx.data.as_slice())),
        AbiToken::Uint8(tx.operation.as_u8()),
    ]))
}

// =============================================================================
// DECODING
// =============================================================================

/// Splits call data into selector and argument bytes.
pub fn split_selector(data: &[u8]) -> Result<([u8; 4], &[u8]), EncodingError> {
    if data.len() < 4 {
        return Err(EncodingError::MissingSelector(data.len()));
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&data[..4]);
    Ok((selector, &data[4..]))
}

/// Strips the selector of `signature`, failing if `data` is for another function.
pub fn strip_selector<'a>(data: &'a [u8], signature: &str) -> Result<&'a [u8], EncodingError> {
    let (selector, args) = split_selector(data)?;
    let expected = function_selector(signature);
    if selector != expected {
        return Err(EncodingError::SelectorMismatch {
            expected: hex::encode(expected),
            actual: hex::encode(selector),
        });
    }
    Ok(args)
}

fn word_at(args: &[u8], index: usize) -> Result<&[u8], EncodingError> {
    let start = index * WORD;
    args.get(start..start + WORD)
        .ok_or(EncodingError::ArgumentOutOfBounds {
            index,
            len: args.len(),
        })
}

/// Decodes the `index`-th static argument as an address.
pub fn decode_address(args: &[u8], index: usize) -> Result<Address, EncodingError> {
    let word = word_at(args, index)?;
    if word[..12].iter().any(|b| *b != 0) {
        return Err(EncodingError::InvalidAddressWord { index });
    }
    Address::from_slice(&word[12..]).ok_or(EncodingError::InvalidAddressWord { index })
}

/// Decodes the `index`-th static argument as a `uint256`.
pub fn decode_uint(args: &[u8], index: usize) -> Result<U256, EncodingError> {
    Ok(U256::from_big_endian(word_at(args, index)?))
}

/// Decodes the `index`-th argument as dynamic `bytes`.
pub fn decode_bytes(args: &[u8], index: usize) -> Result<Vec<u8>, EncodingError> {
    let invalid = EncodingError::InvalidDynamicArgument { index };
    let offset = decode_uint(args, index)?;
    if offset > U256::from(args.len()) {
        return Err(invalid);
    }
    let offset = offset.as_usize();
    let len_word = args.get(offset..offset + WORD).ok_or(invalid.clone())?;
    let len = U256::from_big_endian(len_word);
    if len > U256::from(args.len()) {
        return Err(invalid);
    }
    let len = len.as_usize();
    let start = offset + WORD;
    args.get(start..start + len)
        .map(<[u8]>::to_vec)
        .ok_or(invalid)
}

// =============================================================================
// TESTS
// =============================================================================
