//! # Call Builders
//!
//! Each builder returns the `{to, value, data}` triple the wallet's proposal
//! service expects. Nothing here talks to a network.

use serde::{Deserialize, Serialize};
use shared_types::encoding::{encode_call, encode_tokens, signatures, AbiToken};
use shared_types::entities::{Address, Bytes, Operation, SafeTransaction, Seconds, U256};

/// A wallet call with zero value.
fn call(to: Address, data: Vec<u8>) -> SafeTransaction {
    SafeTransaction {
        to,
        value: U256::zero(),
        data: Bytes::from(data),
    }
}

/// `enableModule(enablee)` on `enabler` (a wallet or a delay guard).
#[must_use]
pub fn enable_module_tx(enabler: Address, enablee: Address) -> SafeTransaction {
    call(
        enabler,
        encode_call(signatures::ENABLE_MODULE, &[AbiToken::Address(enablee)]),
    )
}

/// `swapOwner(prev, old, new)` call data, as executed by the avatar.
#[must_use]
pub fn swap_owner_data(prev_owner: Address, old_owner: Address, new_owner: Address) -> Bytes {
    Bytes::from(encode_call(
        signatures::SWAP_OWNER,
        &[
            AbiToken::Address(prev_owner),
            AbiToken::Address(old_owner),
            AbiToken::Address(new_owner),
        ],
    ))
}

/// The call starting a recovery, plus the payload it will queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecoveryTx {
    /// `startRecovery(SENTINEL, old, new)` on the swap module.
    pub tx: SafeTransaction,
    /// `swapOwner(SENTINEL, old, new)` as it will sit in the delay queue.
    pub encoded: Bytes,
}

/// Builds `startRecovery` for replacing the first owner of the wallet.
#[must_use]
pub fn start_recovery_tx(old_owner: Address, new_owner: Address, swap_module: Address) -> StartRecoveryTx {
    let args = [
        AbiToken::Address(Address::SENTINEL),
        AbiToken::Address(old_owner),
        AbiToken::Address(new_owner),
    ];
    StartRecoveryTx {
        tx: call(swap_module, encode_call(signatures::START_RECOVERY, &args)),
        encoded: swap_owner_data(Address::SENTINEL, old_owner, new_owner),
    }
}

/// `executeNextTx(client_safe, 0, encoded, Call)` on the delay guard.
#[must_use]
pub fn execute_recovery_tx(client_safe: Address, encoded: &Bytes, delay: Address) -> SafeTransaction {
    call(
        delay,
        encode_call(
            signatures::EXECUTE_NEXT_TX,
            &[
                AbiToken::Address(client_safe),
                AbiToken::Uint(U256::zero()),
                AbiToken::Bytes(encoded.as_slice().to_vec()),
                AbiToken::Uint8(Operation::Call.as_u8()),
            ],
        ),
    )
}

/// `deployModule(master_copy, init_params, salt)` on the module factory.
#[must_use]
pub fn deploy_module_call(
    factory: Address,
    master_copy: Address,
    init_params: &Bytes,
    salt: U256,
) -> SafeTransaction {
    call(
        factory,
        encode_call(
            signatures::DEPLOY_MODULE,
            &[
                AbiToken::Address(master_copy),
                AbiToken::Bytes(init_params.as_slice().to_vec()),
                AbiToken::Uint(salt),
            ],
        ),
    )
}

/// `setUp(abi.encode(params))` initialiser.
#[must_use]
pub fn setup_params(params: &[AbiToken]) -> Bytes {
    Bytes::from(encode_call(
        signatures::SET_UP,
        &[AbiToken::Bytes(encode_tokens(params))],
    ))
}

/// Initialiser of a delay guard: `(owner, avatar, target, cooldown, expiration)`.
#[must_use]
pub fn delay_setup_params(
    owner: Address,
    avatar: Address,
    target: Address,
    cooldown: Seconds,
    expiration: Seconds,
) -> Bytes {
    setup_params(&[
        AbiToken::Address(owner),
        AbiToken::Address(avatar),
        AbiToken::Address(target),
        AbiToken::Uint(U256::from(cooldown)),
        AbiToken::Uint(U256::from(expiration)),
    ])
}

/// Initialiser of a swap-owner module: `(target, avatar, owner)`.
#[must_use]
pub fn swap_setup_params(target: Address, avatar: Address, owner: Address) -> Bytes {
    setup_params(&[
        AbiToken::Address(target),
        AbiToken::Address(avatar),
        AbiToken::Address(owner),
    ])
}
