//! Deployment of adapter contracts to a node.

use adapter_interface::AdapterKind;
use alloy::primitives::Address;
use alloy::sol_types::SolValue;
use chain_client::{ArtifactStore, ChainBackend, ChainError};

pub mod cli;


/// Deploys the adapter of the given kind from the node's first account and returns
/// the address of the created contract.
///
/// The adapter is constructed with a zero registry address.
pub fn deploy_adapter<B: ChainBackend>(
    chain: &B,
    artifacts: &ArtifactStore,
    kind: AdapterKind,
) -> Result<Address, ChainError> {
    let deployer = chain
        .accounts()?
        .into_iter()
        .next()
        .ok_or(ChainError::NoAccounts)?;
    let artifact = artifacts.find(kind.contract_name())?;

    let address = chain.deploy(&deployer, &artifact, &Address::ZERO.abi_encode())?;
    tracing::info!(%kind, %deployer, %address, "adapter deployed");

    Ok(address)
}

/// Line printed by the CLI once a deployment succeeds.
pub fn deployment_line(kind: AdapterKind, address: &Address) -> String {
    format!("{} deployed to:  {}", kind.contract_name(), address)
}
