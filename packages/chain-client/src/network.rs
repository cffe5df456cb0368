use std::env;
use std::str::FromStr;
use std::time::Duration;

use adapter_interface::AdapterKind;

use crate::error::{ChainError, ChainResult};

pub const ENV_NETWORK: &str = "ADAPTER_NETWORK";
pub const ENV_RPC_URL: &str = "ADAPTER_RPC_URL";
pub const ENV_NODE: &str = "ADAPTER_NODE";
pub const ENV_CONFIRMATION_TIMEOUT_SECS: &str = "ADAPTER_CONFIRMATION_TIMEOUT_SECS";

const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Development node flavour; decides which non-standard RPC methods exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Hardhat,
    Anvil,
}

impl NodeKind {
    pub fn storage_write_method(&self) -> &'static str {
        match self {
            NodeKind::Hardhat => "hardhat_setStorageAt",
            NodeKind::Anvil => "anvil_setStorageAt",
        }
    }
}

impl FromStr for NodeKind {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hardhat" => Ok(NodeKind::Hardhat),
            "anvil" => Ok(NodeKind::Anvil),
            _ => Err(ChainError::InvalidConfig {
                key: ENV_NODE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Static description of a known network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkInfo {
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub node: NodeKind,
}

/// Local hardhat node forking Ethereum mainnet
pub const ETHEREUM_FORK: NetworkInfo = NetworkInfo {
    name: "ethereum",
    rpc_url: "http://127.0.0.1:8545",
    node: NodeKind::Hardhat,
};

/// Local hardhat node forking Avalanche C-Chain
pub const AVALANCHE_FORK: NetworkInfo = NetworkInfo {
    name: "avalanche",
    rpc_url: "http://127.0.0.1:8545",
    node: NodeKind::Hardhat,
};

pub const NETWORKS: [NetworkInfo; 2] = [ETHEREUM_FORK, AVALANCHE_FORK];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub node: NodeKind,
    /// How long to wait for a transaction receipt
    pub confirmation_timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
    /// Upper bound of a single HTTP request
    pub request_timeout: Duration,
}

impl From<&NetworkInfo> for NetworkConfig {
    fn from(info: &NetworkInfo) -> Self {
        Self {
            name: info.name.to_string(),
            rpc_url: info.rpc_url.to_string(),
            node: info.node,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl NetworkConfig {
    pub fn by_name(name: &str) -> Option<Self> {
        NETWORKS
            .iter()
            .find(|info| info.name == name)
            .map(NetworkConfig::from)
    }

    /// Network the given adapter's protocol lives on.
    pub fn for_adapter(kind: AdapterKind) -> Self {
        Self::by_name(kind.network()).unwrap_or_else(|| NetworkConfig::from(&ETHEREUM_FORK))
    }

    /// Preset for `kind` with overrides from the process environment.
    pub fn from_env(kind: AdapterKind) -> ChainResult<Self> {
        Self::from_lookup(kind, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(kind: AdapterKind, lookup: F) -> ChainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_NETWORK) {
            Some(name) => Self::by_name(&name).ok_or(ChainError::InvalidConfig {
                key: ENV_NETWORK.to_string(),
                value: name,
            })?,
            None => Self::for_adapter(kind),
        };

        if let Some(rpc_url) = lookup(ENV_RPC_URL) {
            config.rpc_url = rpc_url;
        }
        if let Some(node) = lookup(ENV_NODE) {
            config.node = node.parse()?;
        }
        if let Some(secs) = lookup(ENV_CONFIRMATION_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| ChainError::InvalidConfig {
                key: ENV_CONFIRMATION_TIMEOUT_SECS.to_string(),
                value: secs.clone(),
            })?;
            config.confirmation_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }
}
