//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! config (RPC URL, chain id, timeouts)
//!     → client.rs (alloy providers, per-call timeouts, failover reads)
//!     → types.rs (error taxonomy, receipt view, rejection classifier)
//! ```
//!
//! The [`ChainRpc`] trait is the seam the deployment orchestrator depends
//! on: [`ChainClient`] implements it against a live node, tests implement
//! it with a scripted in-memory chain.

pub mod client;
pub mod types;

use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};

pub use client::ChainClient;
pub use types::{DeployError, DeployReceipt, DeployResult, SubmissionReason};

/// Node operations a deployment needs.
///
/// Mirrors the JSON-RPC surface one-to-one; no call mutates local state, so
/// every method takes `&self` and is safe to share across tasks.
pub trait ChainRpc {
    /// Balance of an address in wei.
    fn get_balance(
        &self,
        address: Address,
    ) -> impl std::future::Future<Output = DeployResult<U256>> + Send;

    /// The account's next valid nonce.
    fn get_transaction_count(
        &self,
        address: Address,
    ) -> impl std::future::Future<Output = DeployResult<u64>> + Send;

    /// Node-suggested gas price in wei.
    fn get_gas_price(&self) -> impl std::future::Future<Output = DeployResult<u128>> + Send;

    /// Submit a raw signed transaction, returning its hash.
    fn send_raw_transaction(
        &self,
        raw: &Bytes,
    ) -> impl std::future::Future<Output = DeployResult<TxHash>> + Send;

    /// Poll until a receipt exists or the timeout elapses.
    fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        poll_interval: Duration,
        wait_timeout: Duration,
    ) -> impl std::future::Future<Output = DeployResult<DeployReceipt>> + Send;

    /// Code installed at an address; empty if none.
    fn get_code(
        &self,
        address: Address,
    ) -> impl std::future::Future<Output = DeployResult<Bytes>> + Send;
}
