//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Errors that can occur during a deployment attempt.
///
/// Every variant is terminal for the current attempt: correcting the
/// condition (new nonce, new price, new key, longer timeout) requires the
/// caller to rebuild from scratch rather than blindly retry.
#[derive(Debug, Error)]
pub enum DeployError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Compiler output could not be used (malformed artifact or bytecode).
    #[error("Compilation artifact error: {0}")]
    Compilation(String),

    /// Key material could not be obtained (missing or unreadable credential).
    #[error("Credential error: {0}")]
    Credential(String),

    /// Private key is not a valid curve scalar.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Transaction could not be signed (malformed input transaction).
    #[error("Signing error: {0}")]
    Signing(String),

    /// Node rejected the submitted transaction. The node's raw message is
    /// carried verbatim alongside the classified reason.
    #[error("Submission rejected ({reason}): {message}")]
    Submission {
        reason: SubmissionReason,
        message: String,
    },

    /// No receipt appeared within the confirmation window. The transaction
    /// may still be mined later; the hash remains valid for re-polling.
    #[error("No receipt after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction was mined but reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Receipt exists but no contract code was actually installed.
    #[error("Deployment verification failed: {0}")]
    VerificationFailed(String),

    /// Gas price exceeded the configured ceiling.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// Node-side rejection categories for a submitted raw transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionReason {
    /// The nonce was already consumed by an earlier transaction.
    NonceTooLow,
    /// Gas price below the node's acceptance threshold.
    Underpriced,
    /// Sender balance cannot cover value + gas.
    InsufficientFunds,
    /// Anything the node reports that we do not classify.
    Other,
}

impl SubmissionReason {
    /// Classify a node rejection message.
    ///
    /// Node implementations word these differently (geth, erigon, anvil),
    /// so matching is on lowercase substrings.
    pub fn classify(message: &str) -> Self {
        let msg = message.to_lowercase();
        if msg.contains("nonce too low") || msg.contains("nonce is too low") {
            SubmissionReason::NonceTooLow
        } else if msg.contains("underpriced") {
            SubmissionReason::Underpriced
        } else if msg.contains("insufficient funds") || msg.contains("insufficient balance") {
            SubmissionReason::InsufficientFunds
        } else {
            SubmissionReason::Other
        }
    }
}

impl std::fmt::Display for SubmissionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionReason::NonceTooLow => "nonce too low",
            SubmissionReason::Underpriced => "underpriced",
            SubmissionReason::InsufficientFunds => "insufficient funds",
            SubmissionReason::Other => "other",
        };
        f.write_str(s)
    }
}

/// Minimal view of a mined transaction's receipt.
///
/// `contract_address` is present iff the transaction was a creation and the
/// node assigned an address; presence alone does not prove code was
/// installed, which is why the orchestrator performs a separate code check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReceipt {
    pub transaction_hash: TxHash,
    pub contract_address: Option<Address>,
    pub status: bool,
    pub block_number: Option<u64>,
}

impl From<alloy::rpc::types::TransactionReceipt> for DeployReceipt {
    fn from(receipt: alloy::rpc::types::TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            status: receipt.status(),
            block_number: receipt.block_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rejections() {
        assert_eq!(
            SubmissionReason::classify("nonce too low: next nonce 8, tx nonce 7"),
            SubmissionReason::NonceTooLow
        );
        assert_eq!(
            SubmissionReason::classify("replacement transaction underpriced"),
            SubmissionReason::Underpriced
        );
        assert_eq!(
            SubmissionReason::classify("INSUFFICIENT FUNDS for gas * price + value"),
            SubmissionReason::InsufficientFunds
        );
        assert_eq!(
            SubmissionReason::classify("already known"),
            SubmissionReason::Other
        );
    }

    #[test]
    fn test_error_display() {
        let err = DeployError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = DeployError::Submission {
            reason: SubmissionReason::NonceTooLow,
            message: "nonce too low".to_string(),
        };
        assert!(err.to_string().contains("nonce too low"));

        let err = DeployError::GasPriceTooHigh {
            current_gwei: 600,
            max_gwei: 500,
        };
        assert!(err.to_string().contains("600"));
    }
}
