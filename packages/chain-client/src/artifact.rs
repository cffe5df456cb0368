use std::fs;
use std::path::{Path, PathBuf};

use alloy::hex;
use serde::Deserialize;

use crate::error::{ChainError, ChainResult};

/// Compiled contract ready to be deployed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractArtifact {
    pub contract_name: String,
    /// Creation bytecode; empty for artifacts that only carry a name
    pub bytecode: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    bytecode: String,
}

impl ContractArtifact {
    /// An artifact identified only by its name, for backends that instantiate
    /// contracts by name.
    pub fn named(contract_name: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            bytecode: vec![],
        }
    }

    /// Parses a hardhat artifact (`contractName` + `0x`-prefixed `bytecode`).
    pub fn from_json(json: &str) -> ChainResult<Self> {
        let artifact: HardhatArtifact = serde_json::from_str(json)
            .map_err(|e| ChainError::Parse(format!("invalid artifact: {e}")))?;
        let bytecode = hex::decode(&artifact.bytecode).map_err(|e| {
            ChainError::Parse(format!(
                "invalid bytecode in artifact {}: {e}",
                artifact.contract_name
            ))
        })?;

        Ok(Self {
            contract_name: artifact.contract_name,
            bytecode,
        })
    }

    pub fn load(path: &Path) -> ChainResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| ChainError::ArtifactRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn creation_code(&self, constructor_args: &[u8]) -> Vec<u8> {
        let mut code = self.bytecode.clone();
        code.extend_from_slice(constructor_args);
        code
    }
}

/// Where contract artifacts come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactStore {
    /// A hardhat `artifacts/` tree, searched recursively for `<Name>.json`
    Directory(PathBuf),
    /// Name-only artifacts for the simulated chain
    InMemory,
}

impl ArtifactStore {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        ArtifactStore::Directory(dir.into())
    }

    pub fn in_memory() -> Self {
        ArtifactStore::InMemory
    }

    pub fn find(&self, contract_name: &str) -> ChainResult<ContractArtifact> {
        match self {
            ArtifactStore::InMemory => Ok(ContractArtifact::named(contract_name)),
            ArtifactStore::Directory(dir) => {
                let file_name = format!("{contract_name}.json");
                let path = find_file(dir, &file_name)?.ok_or_else(|| {
                    ChainError::ArtifactNotFound {
                        name: contract_name.to_string(),
                        dir: dir.display().to_string(),
                    }
                })?;
                tracing::debug!(path = %path.display(), "loading artifact");
                ContractArtifact::load(&path)
            }
        }
    }
}

fn find_file(dir: &Path, file_name: &str) -> ChainResult<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ChainError::ArtifactRead {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut subdirs = vec![];
    for entry in entries {
        let entry = entry.map_err(|e| ChainError::ArtifactRead {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if path.file_name().and_then(|name| name.to_str()) == Some(file_name) {
            return Ok(Some(path));
        }
    }

    subdirs.sort();
    for subdir in subdirs {
        if let Some(found) = find_file(&subdir, file_name)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}
