//! Static liquidity pool configuration, one table per protocol integration.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use adapter_interface::AdapterKind;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

pub mod error;


pub use crate::error::RegistryError;

const SUSHI_BAR_POOLS: &str = include_str!("../pools/sushi-bar-pools.json");
const PANGOLIN_STAKE_POOLS: &str = include_str!("../pools/pangolin-stake-pools.json");

/// One liquidity pool or staking position to exercise an adapter against.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoolItem {
    /// The pool / staking contract
    pub pool: Address,
    /// Receipt token minted by the pool (the share token)
    pub lp_token: Address,
    /// Underlying tokens the pool accepts; the first one is the one deposited
    pub tokens: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_tokens: Option<Vec<Address>>,
    /// Pools whose contract has been decommissioned stay configured but are not exercised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl PoolItem {
    pub fn is_deprecated(&self) -> bool {
        self.deprecated == Some(true)
    }

    pub fn underlying_token(&self) -> Option<Address> {
        self.tokens.first().copied()
    }

    pub fn reward_token(&self) -> Option<Address> {
        self.reward_tokens
            .as_ref()
            .and_then(|tokens| tokens.first().copied())
    }
}

/// Named pool entries of a single protocol integration, iterated in name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolRegistry {
    pools: BTreeMap<String, PoolItem>,
}

impl PoolRegistry {
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let pools: BTreeMap<String, PoolItem> = serde_json::from_str(json)?;
        Self::from_pools(pools)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| RegistryError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    pub fn from_pools(pools: BTreeMap<String, PoolItem>) -> Result<Self, RegistryError> {
        for (name, pool) in &pools {
            if pool.tokens.is_empty() {
                return Err(RegistryError::NoUnderlyingToken { name: name.clone() });
            }
        }
        Ok(Self { pools })
    }

    /// The pool table shipped with this crate for the given adapter.
    pub fn bundled(kind: AdapterKind) -> Result<Self, RegistryError> {
        match kind {
            AdapterKind::SushiBar => sushi_bar_pools(),
            AdapterKind::PangolinStake => pangolin_stake_pools(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PoolItem> {
        self.pools.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PoolItem)> {
        self.pools.iter()
    }

    /// Entries that are not marked deprecated.
    pub fn active(&self) -> impl Iterator<Item = (&String, &PoolItem)> {
        self.pools.iter().filter(|(_, pool)| !pool.is_deprecated())
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

pub fn sushi_bar_pools() -> Result<PoolRegistry, RegistryError> {
    PoolRegistry::from_json_str(SUSHI_BAR_POOLS)
}

pub fn pangolin_stake_pools() -> Result<PoolRegistry, RegistryError> {
    PoolRegistry::from_json_str(PANGOLIN_STAKE_POOLS)
}
