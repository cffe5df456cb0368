//! Conformance harness for DeFi adapters: runs the deposit / claim / withdraw life
//! cycle through an adapter for each configured pool and checks every adapter view
//! against the pool's own accounting.

pub mod error;
pub mod protocol;
pub mod scenario;
pub mod signers;
pub mod suite;

#[cfg(test)]
mod testing_protocol;

pub use error::HarnessError;
pub use protocol::{share_amount_in_token, Protocol, PANGOLIN_REWARD_TOKEN};
pub use scenario::{
    seed_amount, Checkpoint, Scenario, ScenarioOutcome, ScenarioReport,
    DEFAULT_SCENARIO_TIMEOUT, SEED_UNITS,
};
pub use signers::Signers;
pub use suite::{AdapterSuite, PoolResult, SuiteReport};
