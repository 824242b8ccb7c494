//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (balance, nonce, gas price, code)
//! - Submit raw signed transactions and poll for receipts
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::chain::types::{DeployError, DeployReceipt, DeployResult, SubmissionReason};
use crate::chain::ChainRpc;
use crate::config::RpcConfig;

/// Blockchain RPC client wrapper with failover support for reads.
///
/// Raw transaction submission always goes through the primary provider so a
/// node rejection is reported exactly once, never retried on a failover.
#[derive(Clone)]
pub struct ChainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: RpcConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client from the RPC configuration.
    pub async fn new(config: RpcConfig) -> DeployResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            DeployError::Config(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url))
                    as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        // Verify chain ID matches configuration
        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Chain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Chain client initialized but chain verification failed"
                );
                // Don't fail initialization - allow graceful degradation
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> DeployResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(DeployError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> DeployResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(DeployError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> DeployResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(DeployError::Rpc(
            "All providers failed to get block number".to_string(),
        ))
    }

    /// Check if the node endpoint is reachable.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_connected(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Get the balance of an address in wei.
    pub async fn get_balance(&self, address: Address) -> DeployResult<U256> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_balance(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(DeployError::Rpc(
            "All providers failed to get balance".to_string(),
        ))
    }

    /// Get the transaction count (next nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> DeployResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_count(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(DeployError::Rpc(
            "All providers failed to get transaction count".to_string(),
        ))
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> DeployResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_gas_price();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(DeployError::Rpc(
            "All providers failed to get gas price".to_string(),
        ))
    }

    /// Get the code installed at an address.
    ///
    /// An empty byte sequence means no code at that address. That is data,
    /// not an error; the orchestrator decides what it means.
    pub async fn get_code(&self, address: Address) -> DeployResult<Bytes> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_code_at(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(DeployError::Rpc(
            "All providers failed to get code".to_string(),
        ))
    }

    /// Submit a raw signed transaction, primary provider only.
    ///
    /// A node rejection (nonce collision, underpriced, insufficient funds)
    /// is classified and the node's raw message carried verbatim. Transport
    /// failures surface as [`DeployError::Rpc`].
    pub async fn send_raw_transaction(&self, raw: &Bytes) -> DeployResult<TxHash> {
        let fut = self.providers[0].send_raw_transaction(raw.as_ref());
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => {
                if let Some(payload) = e.as_error_resp() {
                    let message = payload.message.to_string();
                    Err(DeployError::Submission {
                        reason: SubmissionReason::classify(&message),
                        message,
                    })
                } else {
                    Err(DeployError::Rpc(format!("Transaction submission failed: {}", e)))
                }
            }
            Err(_) => Err(DeployError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get a transaction receipt by hash, if the transaction has been mined.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> DeployResult<Option<DeployReceipt>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result.map(DeployReceipt::from)),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(DeployError::Rpc(
            "All providers failed to get receipt".to_string(),
        ))
    }

    /// Poll for a receipt until it exists or the timeout elapses.
    ///
    /// Polling an already-known hash is side-effect-free: this is safe to
    /// call again after a timeout, or concurrently from multiple callers.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        poll_interval: Duration,
        wait_timeout: Duration,
    ) -> DeployResult<DeployReceipt> {
        let result = timeout(wait_timeout, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.get_transaction_receipt(tx_hash).await? {
                    Some(receipt) => return Ok(receipt),
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(DeployError::ConfirmationTimeout(wait_timeout.as_secs())),
        }
    }
}

impl ChainRpc for ChainClient {
    async fn get_balance(&self, address: Address) -> DeployResult<U256> {
        ChainClient::get_balance(self, address).await
    }

    async fn get_transaction_count(&self, address: Address) -> DeployResult<u64> {
        ChainClient::get_transaction_count(self, address).await
    }

    async fn get_gas_price(&self) -> DeployResult<u128> {
        ChainClient::get_gas_price(self).await
    }

    async fn send_raw_transaction(&self, raw: &Bytes) -> DeployResult<TxHash> {
        ChainClient::send_raw_transaction(self, raw).await
    }

    async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        poll_interval: Duration,
        wait_timeout: Duration,
    ) -> DeployResult<DeployReceipt> {
        ChainClient::wait_for_receipt(self, tx_hash, poll_interval, wait_timeout).await
    }

    async fn get_code(&self, address: Address) -> DeployResult<Bytes> {
        ChainClient::get_code(self, address).await
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RpcConfig {
        RpcConfig {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337, // Anvil default
            rpc_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_client_creation() {
        // Client creation should succeed even if the RPC is unreachable
        let config = test_config();
        let result = ChainClient::new(config).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_rpc_url_rejected() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let result = ChainClient::new(config).await;
        assert!(matches!(result, Err(DeployError::Config(_))));
    }

    #[tokio::test]
    async fn test_rpc_failover_exhaustion() {
        let mut config = test_config();
        config.rpc_timeout_secs = 1;
        config.failover_urls.push("http://invalid:8545".to_string());

        let client = ChainClient::new(config).await.unwrap();

        // Both endpoints are dead, so the loop must exhaust and report it
        let result = client.get_chain_id().await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("All RPC providers failed"));
    }
}
