use std::path::PathBuf;

use adapter_interface::AdapterKind;
use chain_client::{ChainError, NetworkConfig};
use clap::{Parser, Subcommand};

/// Deploys DeFi adapter contracts to a local or forked EVM node
#[derive(Parser, Debug)]
#[command(name = "adapter-deploy")]
pub struct Cli {
    /// Network preset (ethereum | avalanche); defaults to the adapter's network
    #[arg(long, global = true, env = "ADAPTER_NETWORK")]
    pub network: Option<String>,

    /// JSON-RPC endpoint of the node
    #[arg(long, global = true, env = "ADAPTER_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Directory holding the compiled contract artifacts
    #[arg(long, global = true, env = "ADAPTER_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Deploy the SushiBar adapter
    DeploySushiBarAdapter,
    /// Deploy the Pangolin staking adapter
    DeployPangolinStakeAdapter,
}

impl Command {
    pub fn adapter_kind(&self) -> AdapterKind {
        match self {
            Command::DeploySushiBarAdapter => AdapterKind::SushiBar,
            Command::DeployPangolinStakeAdapter => AdapterKind::PangolinStake,
        }
    }
}

impl Cli {
    /// Network the command runs against: the adapter's preset (or the one named by
    /// `--network`) with environment overrides, then `--rpc-url`.
    pub fn network_config<F>(&self, lookup: F) -> Result<NetworkConfig, ChainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = self.network.clone();
        let mut config = NetworkConfig::from_lookup(self.command.adapter_kind(), |key| {
            if key == chain_client::network::ENV_NETWORK {
                network.clone().or_else(|| lookup(key))
            } else {
                lookup(key)
            }
        })?;

        if let Some(rpc_url) = &self.rpc_url {
            config = config.with_rpc_url(rpc_url.clone());
        }

        Ok(config)
    }
}
