//! Contract artifacts and per-network deployment resolution.

pub mod resolver;

pub use resolver::ArtifactResolver;

use crate::error::ResolutionError;
use primitive_types::H160;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A 20-byte ledger contract address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address(H160);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_fixed_bytes()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(H160::from(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = ResolutionError;

    /// Accepts `0x` + 40 hex digits in any case (checksum casing is not enforced).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ResolutionError::NoArtifact(format!("address `{}` lacks 0x prefix", s)))?;
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|_| ResolutionError::NoArtifact(format!("`{}` is not a 20-byte hex address", s)))?;
        Ok(Self::from(bytes))
    }
}

/// One deployment entry under `networks`. Extra keys (transaction hash,
/// links, ...) are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkDeployment {
    pub address: String,
}

/// Interface description plus per-network deployment addresses.
///
/// Read-only after load; shared across requests behind an `Arc`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractArtifact {
    #[serde(default, alias = "interface")]
    pub abi: JsonValue,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkDeployment>,
}

impl ContractArtifact {
    /// Parses the raw artifact blob. Malformed input is `NoArtifact`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ResolutionError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ResolutionError::NoArtifact(format!("malformed artifact: {}", e)))
    }

    pub fn deployment(&self, network_id: u64) -> Option<&NetworkDeployment> {
        self.networks.get(&network_id.to_string())
    }
}
