//! EVM Contract Deployer Library
//!
//! Takes a compiled contract artifact, builds a contract-creation
//! transaction from live chain state, signs it with a locally held key,
//! submits it, waits for the receipt, and verifies that code was actually
//! installed at the resulting address.
//!
//! ```text
//! artifact (bytecode + ABI)        DEPLOYER_PRIVATE_KEY (env)
//!          │                                  │
//!          ▼                                  ▼
//!   artifact.rs ──────────────▶ deploy::DeploymentOrchestrator ◀── wallet.rs
//!                                             │
//!                                             ▼
//!                               chain::ChainClient (JSON-RPC node)
//! ```

pub mod artifact;
pub mod chain;
pub mod config;
pub mod deploy;
pub mod wallet;

pub use artifact::CompiledArtifact;
pub use chain::{ChainClient, ChainRpc, DeployError, DeployReceipt, DeployResult};
pub use config::DeployerConfig;
pub use deploy::{DeploySettings, DeploymentOrchestrator, DeploymentOutcome};
pub use wallet::SigningWallet;
