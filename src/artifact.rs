//! Compiled-artifact input boundary.
//!
//! Compilation happens outside this crate; the deployer consumes the
//! compiler's JSON output. Both common shapes of the bytecode field are
//! accepted: a flat hex string (hardhat-style artifacts) and solc's
//! `{ "object": "0x…" }` form. The ABI is carried opaquely; the deployer
//! never interprets it, only the payload bytes matter.

use std::fs;
use std::path::Path;

use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::chain::types::{DeployError, DeployResult};

/// A compiled contract as emitted by the external compiler.
#[derive(Debug, Clone, Deserialize)]
pub struct CompiledArtifact {
    /// Contract name, when the artifact carries one.
    #[serde(default, alias = "contractName")]
    pub contract_name: Option<String>,

    /// Structured interface description, passed through untouched.
    #[serde(default)]
    pub abi: serde_json::Value,

    /// Creation bytecode in hex.
    pub bytecode: BytecodeField,
}

/// The two shapes compilers emit for bytecode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BytecodeField {
    Hex(String),
    Object { object: String },
}

impl BytecodeField {
    fn as_hex(&self) -> &str {
        match self {
            BytecodeField::Hex(s) => s,
            BytecodeField::Object { object } => object,
        }
    }
}

impl CompiledArtifact {
    /// Load an artifact from a JSON file.
    pub fn load(path: &Path) -> DeployResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DeployError::Compilation(format!("cannot read artifact {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            DeployError::Compilation(format!("malformed artifact {}: {}", path.display(), e))
        })
    }

    /// Decode the creation bytecode.
    pub fn bytecode(&self) -> DeployResult<Bytes> {
        let hex = self.bytecode.as_hex();
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        if hex.is_empty() {
            return Err(DeployError::Compilation(
                "artifact contains empty bytecode".to_string(),
            ));
        }
        let bytes = alloy::primitives::hex::decode(hex)
            .map_err(|e| DeployError::Compilation(format!("bytecode is not valid hex: {}", e)))?;
        Ok(Bytes::from(bytes))
    }

    /// The full transaction payload: bytecode, with ABI-encoded constructor
    /// arguments appended when present.
    pub fn deploy_data(&self, constructor_args: Option<&Bytes>) -> DeployResult<Bytes> {
        let code = self.bytecode()?;
        match constructor_args {
            None => Ok(code),
            Some(args) => {
                let mut data = code.to_vec();
                data.extend_from_slice(args);
                Ok(Bytes::from(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_artifact_parses() {
        let artifact: CompiledArtifact = serde_json::from_str(
            r#"{ "contractName": "Token", "abi": [], "bytecode": "0x6080604052" }"#,
        )
        .unwrap();

        assert_eq!(artifact.contract_name.as_deref(), Some("Token"));
        assert_eq!(
            artifact.bytecode().unwrap().as_ref(),
            &[0x60, 0x80, 0x60, 0x40, 0x52]
        );
    }

    #[test]
    fn test_solc_object_form_parses() {
        let artifact: CompiledArtifact =
            serde_json::from_str(r#"{ "bytecode": { "object": "6080" } }"#).unwrap();

        assert_eq!(artifact.bytecode().unwrap().as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_malformed_bytecode_rejected() {
        let artifact: CompiledArtifact =
            serde_json::from_str(r#"{ "bytecode": "0xzzzz" }"#).unwrap();
        assert!(matches!(
            artifact.bytecode(),
            Err(DeployError::Compilation(_))
        ));

        let artifact: CompiledArtifact = serde_json::from_str(r#"{ "bytecode": "" }"#).unwrap();
        assert!(matches!(
            artifact.bytecode(),
            Err(DeployError::Compilation(_))
        ));
    }

    #[test]
    fn test_constructor_args_are_appended() {
        let artifact: CompiledArtifact =
            serde_json::from_str(r#"{ "bytecode": "0x6080" }"#).unwrap();

        let args = Bytes::from_static(&[0xaa, 0xbb]);
        let data = artifact.deploy_data(Some(&args)).unwrap();
        assert_eq!(data.as_ref(), &[0x60, 0x80, 0xaa, 0xbb]);

        let plain = artifact.deploy_data(None).unwrap();
        assert_eq!(plain.as_ref(), &[0x60, 0x80]);
    }
}
