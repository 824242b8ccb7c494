//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML config
//! file; every field has a default so a minimal config stays minimal.

use serde::{Deserialize, Serialize};

/// Root configuration for the deployer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployerConfig {
    /// Node endpoint and chain identity.
    pub rpc: RpcConfig,

    /// Receipt polling bounds.
    pub confirmation: ConfirmationConfig,

    /// Gas pricing policy.
    pub gas: GasConfig,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
        }
    }
}

/// Receipt confirmation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Maximum time to wait for a receipt, in seconds.
    pub timeout_secs: u64,

    /// Spacing between receipt polls, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            poll_interval_secs: 2,
        }
    }
}

/// Gas pricing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Pinned gas limit for the creation transaction. When absent a fixed
    /// block-sized fallback is used; no dynamic estimation is performed.
    pub gas_limit: Option<u64>,

    /// Gas price multiplier (1.0 = node-suggested, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_limit: None,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeployerConfig::default();
        assert_eq!(config.rpc.rpc_url, "http://localhost:8545");
        assert_eq!(config.rpc.chain_id, 31337);
        assert_eq!(config.rpc.rpc_timeout_secs, 10);
        assert_eq!(config.confirmation.timeout_secs, 120);
        assert_eq!(config.confirmation.poll_interval_secs, 2);
        assert!(config.gas.gas_limit.is_none());
        assert_eq!(config.gas.max_gas_price_gwei, 500);
    }

    #[test]
    fn test_minimal_toml_parses() {
        let config: DeployerConfig = toml::from_str(
            r#"
            [rpc]
            rpc_url = "https://rpc.example.net"
            chain_id = 11155111
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.rpc_url, "https://rpc.example.net");
        assert_eq!(config.rpc.chain_id, 11155111);
        // Untouched sections keep their defaults
        assert_eq!(config.confirmation.poll_interval_secs, 2);
        assert_eq!(config.gas.gas_price_multiplier, 1.0);
    }

    #[test]
    fn test_full_toml_parses() {
        let config: DeployerConfig = toml::from_str(
            r#"
            [rpc]
            rpc_url = "http://10.0.0.5:8545"
            failover_urls = ["http://10.0.0.6:8545"]
            chain_id = 1
            rpc_timeout_secs = 30

            [confirmation]
            timeout_secs = 300
            poll_interval_secs = 5

            [gas]
            gas_limit = 8000000
            gas_price_multiplier = 1.2
            max_gas_price_gwei = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.failover_urls.len(), 1);
        assert_eq!(config.confirmation.timeout_secs, 300);
        assert_eq!(config.gas.gas_limit, Some(8_000_000));
    }
}
