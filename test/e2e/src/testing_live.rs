//! Suites against a running fork node. Start a fork of the adapter's network, point
//! `ADAPTER_RPC_URL` at it and `ADAPTER_ARTIFACTS` at the compiled contracts, then run
//! with `--ignored`.

use std::env;

use adapter_harness::AdapterSuite;
use adapter_interface::AdapterKind;
use chain_client::{ArtifactStore, ChainBackend, JsonRpcChain, NetworkConfig};
use deploy_interface::deploy_adapter;
use pool_registry::PoolRegistry;

const ENV_ARTIFACTS: &str = "ADAPTER_ARTIFACTS";

fn live_chain(kind: AdapterKind) -> (JsonRpcChain, ArtifactStore) {
    let artifacts = match env::var(ENV_ARTIFACTS) {
        Ok(dir) => ArtifactStore::directory(dir),
        Err(_) => panic!("{ENV_ARTIFACTS} is required, but it wasn't set"),
    };
    let config = NetworkConfig::from_env(kind).unwrap();
    (JsonRpcChain::new(config).unwrap(), artifacts)
}

fn run_live_suite(kind: AdapterKind) {
    let (chain, artifacts) = live_chain(kind);
    let registry = PoolRegistry::bundled(kind).unwrap();

    let suite = AdapterSuite::setup(&chain, kind, &artifacts).unwrap();
    let report = suite.run(&registry);
    for (name, err) in report.failures() {
        eprintln!("{name}: {err}");
    }
    assert!(report.is_success());
}

#[test]
#[ignore]
fn live_sushi_bar_adapter() {
    run_live_suite(AdapterKind::SushiBar);
}

#[test]
#[ignore]
fn live_pangolin_stake_adapter() {
    run_live_suite(AdapterKind::PangolinStake);
}

#[test]
#[ignore]
fn live_deploy_adapter() {
    let (chain, artifacts) = live_chain(AdapterKind::SushiBar);
    let address = deploy_adapter(&chain, &artifacts, AdapterKind::SushiBar).unwrap();
    assert!(!address.is_zero());
    assert!(chain.block_number().unwrap() > 0);
}
