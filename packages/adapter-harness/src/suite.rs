use std::time::Duration;

use adapter_interface::{AdapterKind, TEST_DEFI_ADAPTER};
use alloy::primitives::Address;
use alloy::sol_types::SolValue;
use chain_client::{ArtifactStore, ChainBackend};
use pool_registry::{PoolItem, PoolRegistry};

use crate::error::HarnessError;
use crate::protocol::Protocol;
use crate::scenario::{Scenario, ScenarioOutcome, DEFAULT_SCENARIO_TIMEOUT};
use crate::signers::Signers;

/// An adapter and a router deployed once and shared by every pool scenario of a run.
pub struct AdapterSuite<'a, B: ChainBackend> {
    chain: &'a B,
    kind: AdapterKind,
    protocol: Protocol,
    signers: Signers,
    adapter: Address,
    router: Address,
    timeout: Duration,
}

impl<'a, B: ChainBackend> AdapterSuite<'a, B> {
    /// Deploys the adapter (with a zero registry address) and the router from the
    /// deployer account.
    pub fn setup(
        chain: &'a B,
        kind: AdapterKind,
        artifacts: &ArtifactStore,
    ) -> Result<Self, HarnessError> {
        let signers = Signers::load(chain)?;

        let adapter = chain.deploy(
            &signers.deployer,
            &artifacts.find(kind.contract_name())?,
            &Address::ZERO.abi_encode(),
        )?;
        let router = chain.deploy(&signers.deployer, &artifacts.find(TEST_DEFI_ADAPTER)?, &[])?;
        tracing::info!(%kind, %adapter, %router, "suite contracts deployed");

        Ok(Self {
            chain,
            kind,
            protocol: Protocol::for_adapter(kind),
            signers,
            adapter,
            router,
            timeout: DEFAULT_SCENARIO_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the adapter against `protocol` instead of the one its kind implies.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn kind(&self) -> AdapterKind {
        self.kind
    }

    pub fn adapter(&self) -> Address {
        self.adapter
    }

    pub fn router(&self) -> Address {
        self.router
    }

    pub fn signers(&self) -> &Signers {
        &self.signers
    }

    pub fn scenario(&self) -> Scenario<'_, B> {
        Scenario {
            chain: self.chain,
            signers: &self.signers,
            adapter: self.adapter,
            router: self.router,
            protocol: self.protocol,
            timeout: self.timeout,
        }
    }

    pub fn run_pool(&self, name: &str, pool: &PoolItem) -> Result<ScenarioOutcome, HarnessError> {
        self.scenario().run(name, pool)
    }

    /// Runs every pool's scenario in name order. A failing pool is recorded and the
    /// run moves on to the next one.
    pub fn run(&self, registry: &PoolRegistry) -> SuiteReport {
        let results = registry
            .iter()
            .map(|(name, pool)| {
                let result = self.run_pool(name, pool);
                if let Err(err) = &result {
                    tracing::error!(pool = name.as_str(), error = %err, "scenario failed");
                }
                PoolResult {
                    name: name.clone(),
                    result,
                }
            })
            .collect();

        SuiteReport {
            kind: self.kind,
            results,
        }
    }
}

#[derive(Debug)]
pub struct PoolResult {
    pub name: String,
    pub result: Result<ScenarioOutcome, HarnessError>,
}

#[derive(Debug)]
pub struct SuiteReport {
    pub kind: AdapterKind,
    pub results: Vec<PoolResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.result, Ok(ScenarioOutcome::Completed(_))))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.result, Ok(ScenarioOutcome::Skipped)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_err()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &HarnessError)> {
        self.results.iter().filter_map(|r| match &r.result {
            Err(err) => Some((r.name.as_str(), err)),
            Ok(_) => None,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Result<ScenarioOutcome, HarnessError>> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.result)
    }
}
