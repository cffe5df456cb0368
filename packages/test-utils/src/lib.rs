//! In-memory chain with mock tokens, pools, adapters and router, for exercising the
//! adapter harness without a node.

pub mod adapter;
pub mod chain;
pub mod erc20;
pub mod fork;
pub mod ledger;
pub mod router;
pub mod share_vault;
pub mod staking_rewards;
pub mod testing_mocks;

#[cfg(test)]
mod testing;

pub use adapter::{AdapterFault, BOGUS_REWARD_TOKEN};
pub use chain::SimulatedChain;
pub use fork::liquidity_provider;
pub use testing_mocks::{setup_contract_query_mock, ContractQueryFunc, MockContractQuerier};
