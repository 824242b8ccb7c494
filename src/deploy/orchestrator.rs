//! Deployment lifecycle orchestration.
//!
//! A single attempt walks `Idle → Built → Signed → Submitted → Confirmed`,
//! or lands in `Failed` with the richest available cause. Confirmation alone
//! is not success: a mined creation transaction can still leave no code at
//! the assigned address, so the orchestrator always follows the receipt with
//! a code check before reporting success.

use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::chain::types::{DeployError, DeployResult};
use crate::chain::ChainRpc;
use crate::config::DeployerConfig;
use crate::deploy::transaction::{UnsignedDeployTx, FALLBACK_GAS_LIMIT};
use crate::wallet::SigningWallet;

/// Phases of a single deployment attempt, logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
    Idle,
    Built,
    Signed,
    Submitted,
    Confirmed,
    Failed,
}

impl std::fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeployPhase::Idle => "idle",
            DeployPhase::Built => "built",
            DeployPhase::Signed => "signed",
            DeployPhase::Submitted => "submitted",
            DeployPhase::Confirmed => "confirmed",
            DeployPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tunables for one orchestrator, decoupled from the config file format.
#[derive(Debug, Clone)]
pub struct DeploySettings {
    /// Network identifier bound into the signature (EIP-155).
    pub chain_id: u64,
    /// Pinned gas limit; [`FALLBACK_GAS_LIMIT`] when absent.
    pub gas_limit: Option<u64>,
    /// Safety margin applied to the node-suggested gas price.
    pub gas_price_multiplier: f64,
    /// Ceiling protecting against fee spikes.
    pub max_gas_price_gwei: u64,
    /// Spacing between receipt polls.
    pub poll_interval: Duration,
    /// Bound on the wait for a receipt.
    pub confirmation_timeout: Duration,
}

impl DeploySettings {
    pub fn from_config(config: &DeployerConfig) -> Self {
        Self {
            chain_id: config.rpc.chain_id,
            gas_limit: config.gas.gas_limit,
            gas_price_multiplier: config.gas.gas_price_multiplier,
            max_gas_price_gwei: config.gas.max_gas_price_gwei,
            poll_interval: Duration::from_secs(config.confirmation.poll_interval_secs),
            confirmation_timeout: Duration::from_secs(config.confirmation.timeout_secs),
        }
    }
}

/// Successful deployment result, printable as JSON for CLI consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOutcome {
    pub contract_address: Address,
    pub transaction_hash: TxHash,
    pub deployed_code_len: usize,
}

/// Drives a deployment attempt end to end over an injected chain client.
///
/// The orchestrator owns nonce sequencing for the wallet's address: the
/// build step runs under an internal lock, so concurrent deployments from
/// one instance cannot observe the same nonce.
#[derive(Debug)]
pub struct DeploymentOrchestrator<C> {
    client: C,
    wallet: SigningWallet,
    settings: DeploySettings,
    /// Serializes nonce acquisition (the Idle → Built transition).
    nonce_lock: Mutex<()>,
}

impl<C: ChainRpc> DeploymentOrchestrator<C> {
    pub fn new(client: C, wallet: SigningWallet, settings: DeploySettings) -> Self {
        Self {
            client,
            wallet,
            settings,
            nonce_lock: Mutex::new(()),
        }
    }

    /// The sender address deployments are issued from.
    pub fn sender(&self) -> Address {
        self.wallet.address()
    }

    /// Borrow the underlying chain client, e.g. to re-poll a receipt after
    /// a confirmation timeout.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Assemble an unsigned creation transaction from live chain state.
    ///
    /// The sender balance is queried and logged but never gates the attempt;
    /// affordability is the network's call at submission time.
    pub async fn build_transaction(&self, data: Bytes) -> DeployResult<UnsignedDeployTx> {
        let _nonce_guard = self.nonce_lock.lock().await;

        let from = self.wallet.address();

        match self.client.get_balance(from).await {
            Ok(balance) => tracing::info!(address = %from, balance = %balance, "Sender balance"),
            Err(e) => tracing::warn!(address = %from, error = %e, "Balance query failed"),
        }

        let nonce = self.client.get_transaction_count(from).await?;
        let gas_price = self.client.get_gas_price().await?;

        let gas_price_gwei = gas_price / 1_000_000_000;
        if gas_price_gwei > self.settings.max_gas_price_gwei as u128 {
            return Err(DeployError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.settings.max_gas_price_gwei,
            });
        }
        let adjusted_gas_price = (gas_price as f64 * self.settings.gas_price_multiplier) as u128;

        let gas_limit = self.settings.gas_limit.unwrap_or(FALLBACK_GAS_LIMIT);

        let unsigned = UnsignedDeployTx {
            chain_id: Some(self.settings.chain_id),
            nonce,
            gas_price: adjusted_gas_price,
            gas_limit,
            from,
            value: alloy::primitives::U256::ZERO,
            data,
        };

        tracing::info!(
            phase = %DeployPhase::Built,
            nonce = unsigned.nonce,
            gas_price = unsigned.gas_price,
            gas_limit = unsigned.gas_limit,
            payload_len = unsigned.data.len(),
            "Creation transaction built"
        );

        Ok(unsigned)
    }

    /// Run a full deployment attempt: build, sign, submit, confirm, verify.
    ///
    /// Every failure is terminal for this attempt. A
    /// [`DeployError::ConfirmationTimeout`] leaves the transaction
    /// submitted; callers may keep polling via [`Self::client`] with the
    /// same hash rather than resubmit.
    pub async fn deploy(&self, data: Bytes) -> DeployResult<DeploymentOutcome> {
        let result = self.run(data).await;
        if let Err(e) = &result {
            tracing::error!(phase = %DeployPhase::Failed, error = %e, "Deployment failed");
        }
        result
    }

    async fn run(&self, data: Bytes) -> DeployResult<DeploymentOutcome> {
        let unsigned = self.build_transaction(data).await?;

        let signed = self.wallet.sign(&unsigned)?;
        tracing::info!(
            phase = %DeployPhase::Signed,
            tx_hash = %signed.hash(),
            "Transaction signed"
        );

        let tx_hash = self.client.send_raw_transaction(signed.raw()).await?;
        tracing::info!(phase = %DeployPhase::Submitted, tx_hash = %tx_hash, "Transaction submitted");

        let receipt = self
            .client
            .wait_for_receipt(
                tx_hash,
                self.settings.poll_interval,
                self.settings.confirmation_timeout,
            )
            .await?;

        if !receipt.status {
            return Err(DeployError::Reverted(format!(
                "transaction {} reverted in block {:?}",
                tx_hash, receipt.block_number
            )));
        }

        let contract_address = receipt.contract_address.ok_or_else(|| {
            DeployError::VerificationFailed(format!(
                "receipt for {} carries no contract address",
                tx_hash
            ))
        })?;

        // Mined is not installed: verify code actually exists at the address
        let code = self.client.get_code(contract_address).await?;
        if code.is_empty() {
            return Err(DeployError::VerificationFailed(format!(
                "no code at {} after confirmed receipt",
                contract_address
            )));
        }

        tracing::info!(
            phase = %DeployPhase::Confirmed,
            contract_address = %contract_address,
            tx_hash = %tx_hash,
            code_len = code.len(),
            "Contract deployed and verified"
        );

        Ok(DeploymentOutcome {
            contract_address,
            transaction_hash: tx_hash,
            deployed_code_len: code.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(DeployPhase::Idle.to_string(), "idle");
        assert_eq!(DeployPhase::Confirmed.to_string(), "confirmed");
        assert_eq!(DeployPhase::Failed.to_string(), "failed");
    }

    #[test]
    fn test_settings_from_config() {
        let config = DeployerConfig::default();
        let settings = DeploySettings::from_config(&config);
        assert_eq!(settings.chain_id, config.rpc.chain_id);
        assert_eq!(settings.poll_interval, Duration::from_secs(2));
        assert_eq!(settings.confirmation_timeout, Duration::from_secs(120));
        assert!(settings.gas_limit.is_none());
    }

    #[test]
    fn test_outcome_serializes_for_cli() {
        let outcome = DeploymentOutcome {
            contract_address: Address::ZERO,
            transaction_hash: TxHash::ZERO,
            deployed_code_len: 42,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("contract_address"));
        assert!(json.contains("42"));
    }
}
