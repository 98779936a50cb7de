//! Deterministic stand-in for the module factory.

use shared_types::encoding::{encode_tokens, keccak256, AbiToken};
use shared_types::entities::{Address, Bytes, U256};

use crate::domain::OrchestratorError;
use crate::ports::ModuleDeployer;

/// Derives a module identity from every deployment input.
///
/// `keccak256(0xff ++ factory ++ keccak256(abi.encode(master_copy,
/// keccak256(init_params), salt)))`, last 20 bytes. Same inputs always give
/// the same identity; any changed input gives a different one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicDeployer;

impl ModuleDeployer for DeterministicDeployer {
    fn predict_address(
        &self,
        factory: Address,
        master_copy: Address,
        init_params: &Bytes,
        salt: U256,
    ) -> Result<Address, OrchestratorError> {
        if master_copy.is_zero() {
            return Err(OrchestratorError::Deployment(
                "master copy can not be zero address".into(),
            ));
        }
        let inner = keccak256(&encode_tokens(&[
            AbiToken::Address(master_copy),
            AbiToken::FixedBytes(keccak256(init_params.as_slice())),
            AbiToken::Uint(salt),
        ]));

        let mut preimage = Vec::with_capacity(1 + 20 + 32);
        preimage.push(0xff);
        preimage.extend_from_slice(factory.as_bytes());
        preimage.extend_from_slice(inner.as_bytes());

        let digest = keccak256(&preimage);
        Address::from_slice(&digest.as_bytes()[12..])
            .ok_or_else(|| OrchestratorError::Deployment("digest too short".into()))
    }
}
