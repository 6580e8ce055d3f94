use std::path::Path;
use std::sync::{Arc, OnceLock};

use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{address, Address};
use color_eyre::eyre::{eyre, Result};

use crate::data::error::{BridgeError, BridgeResult};

/// Address the WavePortal contract was deployed to.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("132Aa303B0990773376540CEb1F105F3F75F10a5");

static WAVE_PORTAL_ABI: OnceLock<JsonAbi> = OnceLock::new();

fn bundled_abi() -> &'static JsonAbi {
    WAVE_PORTAL_ABI.get_or_init(|| {
        serde_json::from_str(include_str!("../../abis/WavePortal.json"))
            .expect("bundled WavePortal ABI should be valid")
    })
}

/// Where the contract lives and how to talk to it.
///
/// Handed to the bridge at construction so nothing about the deployment is
/// global; tests build their own.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    pub address: Address,
    pub abi: Arc<JsonAbi>,
}

impl ContractConfig {
    pub fn new(address: Address, abi: JsonAbi) -> Self {
        Self {
            address,
            abi: Arc::new(abi),
        }
    }

    /// The bundled WavePortal interface at `address`.
    pub fn wave_portal(address: Address) -> Self {
        Self::new(address, bundled_abi().clone())
    }

    /// Parse an interface document. Accepts either a bare ABI array or a
    /// compiler artifact carrying the ABI under an `"abi"` key.
    pub fn from_json(address: Address, json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let abi_value = match value.get("abi") {
            Some(abi) => abi.clone(),
            None => value,
        };
        if !abi_value.is_array() {
            return Err(eyre!("interface document is neither an ABI array nor an artifact"));
        }
        let abi: JsonAbi = serde_json::from_value(abi_value)?;
        Ok(Self::new(address, abi))
    }

    /// Load an interface document from disk.
    pub fn load(address: Address, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| eyre!("failed to read ABI {}: {e}", path.display()))?;
        Self::from_json(address, &json)
    }

    /// Look up a function by name, taking the first overload.
    pub fn function(&self, name: &str) -> BridgeResult<&Function> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| BridgeError::UnknownMethod(name.to_string()))
    }
}
