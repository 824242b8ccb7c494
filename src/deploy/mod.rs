//! Deployment subsystem.
//!
//! # Data Flow
//! ```text
//! compiled artifact (bytecode + constructor args)
//!     → transaction.rs (unsigned creation tx, legacy encoding)
//!     → wallet (deterministic signature)
//!     → orchestrator.rs (build, sign, submit, confirm, verify code)
//! ```

pub mod orchestrator;
pub mod transaction;

pub use orchestrator::{DeployPhase, DeploySettings, DeploymentOrchestrator, DeploymentOutcome};
pub use transaction::{SignedDeployTx, UnsignedDeployTx};
