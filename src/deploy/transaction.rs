//! Contract-creation transaction types.
//!
//! A deployment transaction is a legacy (pre-EIP-1559) transaction with no
//! destination: the payload is initialization code and the network derives
//! the contract address from sender + nonce. Unsigned transactions are built
//! fresh per attempt from live chain state and never reused; the nonce must
//! track the account's evolving transaction count.

use alloy::consensus::{SignableTransaction, Signed, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::chain::types::{DeployError, DeployResult};

/// Gas limit used when the configuration does not pin one.
///
/// The block-gas-limit-sized ceiling favoured by deploy tooling; dynamic
/// estimation is deliberately not performed.
pub const FALLBACK_GAS_LIMIT: u64 = 8_000_000;

/// A contract-creation transaction awaiting signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedDeployTx {
    /// EIP-155 chain binding; signing refuses to proceed without it.
    pub chain_id: Option<u64>,
    /// The sender's next transaction count at build time.
    pub nonce: u64,
    /// Price per gas unit in wei.
    pub gas_price: u128,
    /// Gas ceiling for execution of the initialization code.
    pub gas_limit: u64,
    /// Sender address (derived from the signing wallet).
    pub from: Address,
    /// Native value forwarded to the constructor, usually zero.
    pub value: U256,
    /// Initialization bytecode, optionally with ABI-encoded constructor
    /// arguments appended.
    pub data: Bytes,
}

impl UnsignedDeployTx {
    /// Convert to the consensus legacy transaction, `to` absent.
    pub(crate) fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Create,
            value: self.value,
            input: self.data.clone(),
        }
    }
}

/// A signed, immutable contract-creation transaction.
///
/// Single-use: resubmitting it after inclusion can never produce a second
/// deployment, only a node-policy-dependent no-op or rejection.
#[derive(Debug, Clone)]
pub struct SignedDeployTx {
    inner: Signed<TxLegacy>,
    raw: Bytes,
}

impl SignedDeployTx {
    pub(crate) fn new(inner: Signed<TxLegacy>) -> Self {
        let raw = Bytes::from(inner.encoded_2718());
        Self { inner, raw }
    }

    /// The transaction hash the node will report for this payload.
    pub fn hash(&self) -> TxHash {
        *self.inner.hash()
    }

    /// The raw wire encoding for `eth_sendRawTransaction`.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Recover the signer address from the signature.
    pub fn recover_signer(&self) -> DeployResult<Address> {
        self.inner
            .signature()
            .recover_address_from_prehash(&self.inner.tx().signature_hash())
            .map_err(|e| DeployError::Signing(format!("signer recovery failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_conversion_marks_creation() {
        let unsigned = UnsignedDeployTx {
            chain_id: Some(1),
            nonce: 0,
            gas_price: 1,
            gas_limit: FALLBACK_GAS_LIMIT,
            from: Address::ZERO,
            value: U256::ZERO,
            data: Bytes::from_static(&[0x60, 0x80]),
        };

        let legacy = unsigned.to_legacy();
        assert_eq!(legacy.to, TxKind::Create);
        assert_eq!(legacy.nonce, 0);
        assert_eq!(legacy.input.as_ref(), &[0x60, 0x80]);
    }
}
