//! Wallet management and transaction signing.
//!
//! # Security
//! - Private keys are loaded from an environment variable, never from config
//! - Keys are never logged or serialized; tracing sees the address only
//! - Intermediate key buffers are zeroized once the signer owns the key

use alloy::consensus::SignableTransaction;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use zeroize::Zeroize;

use crate::chain::types::{DeployError, DeployResult};
use crate::deploy::transaction::{SignedDeployTx, UnsignedDeployTx};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "DEPLOYER_PRIVATE_KEY";

/// Holds the signing key for the deployment sender.
///
/// The address is derived once at construction. Signing is a pure
/// cryptographic transform: same key and same transaction fields always
/// produce the same signature (RFC 6979 deterministic nonces).
#[derive(Clone)]
pub struct SigningWallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl SigningWallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without a `0x` prefix. The decoded bytes are
    /// wiped after the signer takes ownership of the scalar.
    pub fn from_hex_key(private_key_hex: &str) -> DeployResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let mut key_bytes = alloy::primitives::hex::decode(key_hex)
            .map_err(|e| DeployError::InvalidKey(format!("not valid hex: {}", e)))?;
        if key_bytes.len() != 32 {
            key_bytes.zeroize();
            return Err(DeployError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let mut scalar = B256::from_slice(&key_bytes);
        key_bytes.zeroize();

        let result = PrivateKeySigner::from_bytes(&scalar)
            .map_err(|e| DeployError::InvalidKey(format!("not a valid curve scalar: {}", e)));
        scalar.0.zeroize();
        let signer = result?;

        let address = signer.address();
        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Load the wallet from the `DEPLOYER_PRIVATE_KEY` environment variable.
    pub fn from_env() -> DeployResult<Self> {
        let mut private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            DeployError::Credential(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        let wallet = Self::from_hex_key(&private_key);
        private_key.zeroize();
        wallet
    }

    /// The wallet's checksummed address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a contract-creation transaction.
    ///
    /// Fails with [`DeployError::Signing`] if the transaction carries no
    /// chain id; an unbound legacy signature would be replayable across
    /// chains, so no partial signature is ever produced.
    pub fn sign(&self, unsigned: &UnsignedDeployTx) -> DeployResult<SignedDeployTx> {
        if unsigned.chain_id.is_none() {
            return Err(DeployError::Signing(
                "transaction is missing a chain id".to_string(),
            ));
        }

        let mut tx = unsigned.to_legacy();
        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| DeployError::Signing(format!("signature failed: {}", e)))?;

        Ok(SignedDeployTx::new(tx.into_signed(signature)))
    }
}

impl std::fmt::Debug for SigningWallet {
    // Key material stays out of Debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningWallet")
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, U256};

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_tx() -> UnsignedDeployTx {
        UnsignedDeployTx {
            chain_id: Some(31337),
            nonce: 7,
            gas_price: 20_000_000_000,
            gas_limit: 8_000_000,
            from: Address::ZERO,
            value: U256::ZERO,
            data: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
        }
    }

    #[test]
    fn test_wallet_from_hex_key() {
        let wallet = SigningWallet::from_hex_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = SigningWallet::from_hex_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_private_key() {
        let result = SigningWallet::from_hex_key("invalid_key");
        assert!(matches!(result, Err(DeployError::InvalidKey(_))));

        let result = SigningWallet::from_hex_key("deadbeef");
        assert!(matches!(result, Err(DeployError::InvalidKey(_))));

        // All-zero scalar is outside the curve's valid range
        let result = SigningWallet::from_hex_key(&"00".repeat(32));
        assert!(matches!(result, Err(DeployError::InvalidKey(_))));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let wallet = SigningWallet::from_hex_key(TEST_PRIVATE_KEY).unwrap();
        let unsigned = test_tx();

        let first = wallet.sign(&unsigned).unwrap();
        let second = wallet.sign(&unsigned).unwrap();

        assert_eq!(first.raw(), second.raw());
        assert_eq!(first.hash(), second.hash());
    }

    #[test]
    fn test_signer_recovery_round_trip() {
        let wallet = SigningWallet::from_hex_key(TEST_PRIVATE_KEY).unwrap();
        let signed = wallet.sign(&test_tx()).unwrap();

        assert_eq!(signed.recover_signer().unwrap(), wallet.address());
    }

    #[test]
    fn test_missing_chain_id_is_rejected() {
        let wallet = SigningWallet::from_hex_key(TEST_PRIVATE_KEY).unwrap();
        let mut unsigned = test_tx();
        unsigned.chain_id = None;

        let result = wallet.sign(&unsigned);
        assert!(matches!(result, Err(DeployError::Signing(_))));
    }

    #[test]
    fn test_debug_hides_key_material() {
        let wallet = SigningWallet::from_hex_key(TEST_PRIVATE_KEY).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("address"));
        assert!(!debug.to_lowercase().contains(TEST_PRIVATE_KEY));
    }
}
