use std::env;

use anyhow::Context;
use chain_client::{ArtifactStore, JsonRpcChain};
use clap::Parser;
use deploy_interface::cli::Cli;
use deploy_interface::{deploy_adapter, deployment_line};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let kind = cli.command.adapter_kind();

    let config = cli.network_config(|key| env::var(key).ok())?;
    tracing::info!(network = %config.name, rpc_url = %config.rpc_url, %kind, "deploying");

    let chain = JsonRpcChain::new(config)?;
    let artifacts = ArtifactStore::directory(cli.artifacts.clone());
    let address = deploy_adapter(&chain, &artifacts, kind)
        .with_context(|| format!("failed to deploy {kind}"))?;

    println!("{}", deployment_line(kind, &address));
    Ok(())
}
