//! Compiled connector artifacts.
//!
//! Reads both hardhat (`"bytecode": "0x…"`) and forge
//! (`"bytecode": { "object": "0x…" }`) JSON layouts.

use std::path::{Path, PathBuf};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde_json::Value;
use tracing::debug;

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone)]
pub struct ConnectorArtifact {
    pub contract_name: String,
    pub path: PathBuf,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ConnectorArtifact {
    /// Find `<contract_name>.json` anywhere under `artifacts_dir` and parse it.
    pub fn load(artifacts_dir: &Path, contract_name: &str) -> Result<Self> {
        let file_name = format!("{contract_name}.json");
        let path = find_file(artifacts_dir, &file_name)?.ok_or_else(|| {
            HarnessError::ArtifactNotFound {
                name: contract_name.to_string(),
                dir: artifacts_dir.to_path_buf(),
            }
        })?;

        let content = std::fs::read_to_string(&path)?;
        let artifact = Self::parse(contract_name, &path, &content)?;
        debug!(
            contract = %contract_name,
            path = %path.display(),
            functions = artifact.abi.functions.len(),
            code_len = artifact.bytecode.len(),
            "loaded artifact"
        );
        Ok(artifact)
    }

    pub fn parse(contract_name: &str, path: &Path, content: &str) -> Result<Self> {
        let invalid = |reason: &str| HarnessError::InvalidArtifact {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let json: Value = serde_json::from_str(content)?;

        let abi_value = json.get("abi").ok_or_else(|| invalid("missing `abi`"))?;
        let abi: JsonAbi = serde_json::from_value(abi_value.clone())?;

        let code = match json.get("bytecode") {
            Some(Value::String(code)) => code.as_str(),
            Some(Value::Object(obj)) => obj
                .get("object")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("missing `bytecode.object`"))?,
            _ => return Err(invalid("missing `bytecode`")),
        };

        let bytecode = hex::decode(code.trim().trim_start_matches("0x"))
            .map_err(|err| invalid(&format!("bytecode is not hex: {err}")))?;
        if bytecode.is_empty() {
            return Err(invalid("empty bytecode, abstract contract or interface"));
        }

        Ok(Self {
            contract_name: contract_name.to_string(),
            path: path.to_path_buf(),
            abi,
            bytecode: bytecode.into(),
        })
    }
}

/// Depth-first search for `file_name`, skipping hardhat debug and build-info files.
fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            if entry.file_name() == "build-info" {
                continue;
            }
            if let Some(found) = find_file(&path, file_name)? {
                return Ok(Some(found));
            }
        } else if entry.file_name() == file_name {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[{
        "type": "function",
        "name": "deposit",
        "stateMutability": "payable",
        "inputs": [
            {"name": "market", "type": "address", "internalType": "address"},
            {"name": "amt", "type": "uint256", "internalType": "uint256"}
        ],
        "outputs": []
    }]"#;

    fn write_artifact(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_hardhat_layout_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            "contracts/mainnet/connectors/compound/v3/main.sol/ConnectV2CompoundV3.dbg.json",
            r#"{"buildInfo": "../build-info/x.json"}"#,
        );
        let expected = write_artifact(
            dir.path(),
            "contracts/mainnet/connectors/compound/v3/main.sol/ConnectV2CompoundV3.json",
            &format!(
                r#"{{"contractName": "ConnectV2CompoundV3", "abi": {ABI}, "bytecode": "0x6080604052"}}"#
            ),
        );

        let artifact = ConnectorArtifact::load(dir.path(), "ConnectV2CompoundV3").unwrap();
        assert_eq!(artifact.path, expected);
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.function("deposit").is_some());
    }

    #[test]
    fn parses_forge_layout() {
        let content = format!(
            r#"{{"abi": {ABI}, "bytecode": {{"object": "0x6001", "linkReferences": {{}}}}}}"#
        );
        let artifact =
            ConnectorArtifact::parse("ConnectV2Hop", Path::new("out/Hop.json"), &content).unwrap();
        assert_eq!(artifact.bytecode.len(), 2);
    }

    #[test]
    fn rejects_interfaces() {
        let content = format!(r#"{{"abi": {ABI}, "bytecode": "0x"}}"#);
        let err =
            ConnectorArtifact::parse("IConnector", Path::new("I.json"), &content).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArtifact { .. }));
    }

    #[test]
    fn missing_artifact_names_the_contract() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConnectorArtifact::load(dir.path(), "ConnectV2Nothing").unwrap_err();
        assert!(matches!(
            err,
            HarnessError::ArtifactNotFound { name, .. } if name == "ConnectV2Nothing"
        ));
    }
}
