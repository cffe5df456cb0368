use std::collections::BTreeMap;

use adapter_interface::{
    AdapterQueryMsg, Erc20ExecuteMsg, Erc20QueryMsg, RouterExecuteMsg, RouterQueryMsg,
    ShareVaultExecuteMsg, ShareVaultQueryMsg, StakingRewardsExecuteMsg, StakingRewardsQueryMsg,
};
use alloy::primitives::Address;
use chain_client::error::{call_reverted, ChainError, ChainResult};
use cosmwasm_std::{from_json, Binary, Uint256};

use crate::adapter::{AdapterCodeQueryMsg, AdapterState};
use crate::erc20::Erc20State;
use crate::share_vault::ShareVaultState;
use crate::staking_rewards::StakingRewardsState;

#[derive(Clone, Debug)]
pub enum Contract {
    Token(Erc20State),
    ShareVault(ShareVaultState),
    StakingRewards(StakingRewardsState),
    Adapter(AdapterState),
    Router,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContractKind {
    Token,
    ShareVault,
    StakingRewards,
    Adapter,
    Router,
}

impl Contract {
    fn kind(&self) -> ContractKind {
        match self {
            Contract::Token(_) => ContractKind::Token,
            Contract::ShareVault(_) => ContractKind::ShareVault,
            Contract::StakingRewards(_) => ContractKind::StakingRewards,
            Contract::Adapter(_) => ContractKind::Adapter,
            Contract::Router => ContractKind::Router,
        }
    }
}

/// The whole simulated world state. Cloned before every transaction so a failing
/// one can be rolled back.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    pub block: u64,
    pub nonce: u64,
    pub contracts: BTreeMap<Address, Contract>,
    pub native: BTreeMap<Address, Uint256>,
}

impl Ledger {
    pub fn contract(&self, address: &Address) -> ChainResult<&Contract> {
        self.contracts
            .get(address)
            .ok_or(ChainError::NoContract { address: *address })
    }

    pub fn contract_mut(&mut self, address: &Address) -> ChainResult<&mut Contract> {
        self.contracts
            .get_mut(address)
            .ok_or(ChainError::NoContract { address: *address })
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.contracts.contains_key(address)
    }

    /// `CREATE` address of the next contract deployed by `deployer`.
    pub fn next_address(&mut self, deployer: &Address) -> Address {
        self.nonce += 1;
        deployer.create(self.nonce)
    }

    /// Any contract with an ERC-20 surface: plain tokens and share vaults.
    pub fn token(&self, address: &Address) -> ChainResult<&Erc20State> {
        match self.contract(address)? {
            Contract::Token(token) => Ok(token),
            Contract::ShareVault(vault) => Ok(&vault.shares),
            _ => Err(call_reverted(*address, "not an ERC-20 token")),
        }
    }

    pub fn token_mut(&mut self, address: &Address) -> ChainResult<&mut Erc20State> {
        match self.contract_mut(address)? {
            Contract::Token(token) => Ok(token),
            Contract::ShareVault(vault) => Ok(&mut vault.shares),
            _ => Err(call_reverted(*address, "not an ERC-20 token")),
        }
    }

    pub fn share_vault(&self, address: &Address) -> ChainResult<&ShareVaultState> {
        match self.contract(address)? {
            Contract::ShareVault(vault) => Ok(vault),
            _ => Err(call_reverted(*address, "not a share vault")),
        }
    }

    pub fn staking_rewards(&self, address: &Address) -> ChainResult<&StakingRewardsState> {
        match self.contract(address)? {
            Contract::StakingRewards(pool) => Ok(pool),
            _ => Err(call_reverted(*address, "not a staking rewards pool")),
        }
    }

    pub fn staking_rewards_mut(
        &mut self,
        address: &Address,
    ) -> ChainResult<&mut StakingRewardsState> {
        match self.contract_mut(address)? {
            Contract::StakingRewards(pool) => Ok(pool),
            _ => Err(call_reverted(*address, "not a staking rewards pool")),
        }
    }

    pub fn adapter(&self, address: &Address) -> ChainResult<&AdapterState> {
        match self.contract(address)? {
            Contract::Adapter(adapter) => Ok(adapter),
            _ => Err(call_reverted(*address, "not an adapter")),
        }
    }

    pub fn adapter_mut(&mut self, address: &Address) -> ChainResult<&mut AdapterState> {
        match self.contract_mut(address)? {
            Contract::Adapter(adapter) => Ok(adapter),
            _ => Err(call_reverted(*address, "not an adapter")),
        }
    }

    pub fn query(&self, contract: &Address, msg: &Binary) -> ChainResult<Binary> {
        match self.contract(contract)?.kind() {
            ContractKind::Token => {
                let msg: Erc20QueryMsg = parse(contract, msg)?;
                self.token(contract)?.query(&msg)
            }
            ContractKind::ShareVault => {
                if let Ok(msg) = from_json::<ShareVaultQueryMsg>(msg) {
                    return self.query_share_vault(contract, &msg);
                }
                let msg: Erc20QueryMsg = parse(contract, msg)?;
                self.token(contract)?.query(&msg)
            }
            ContractKind::StakingRewards => {
                let msg: StakingRewardsQueryMsg = parse(contract, msg)?;
                self.staking_rewards(contract)?.query(&msg, self.block)
            }
            ContractKind::Adapter => {
                if let Ok(msg) = from_json::<AdapterQueryMsg>(msg) {
                    return self.query_adapter(contract, &msg);
                }
                let msg: AdapterCodeQueryMsg = parse(contract, msg)?;
                self.query_adapter_codes(contract, &msg)
            }
            ContractKind::Router => {
                let msg: RouterQueryMsg = parse(contract, msg)?;
                self.query_router(&msg)
            }
        }
    }

    pub fn execute(
        &mut self,
        sender: &Address,
        contract: &Address,
        msg: &Binary,
    ) -> ChainResult<()> {
        match self.contract(contract)?.kind() {
            ContractKind::Token => {
                let msg: Erc20ExecuteMsg = parse(contract, msg)?;
                self.token_mut(contract)?.execute(sender, msg)
            }
            ContractKind::ShareVault => {
                if let Ok(msg) = from_json::<ShareVaultExecuteMsg>(msg) {
                    return self.execute_share_vault(sender, contract, msg);
                }
                let msg: Erc20ExecuteMsg = parse(contract, msg)?;
                self.token_mut(contract)?.execute(sender, msg)
            }
            ContractKind::StakingRewards => {
                let msg: StakingRewardsExecuteMsg = parse(contract, msg)?;
                self.execute_staking_rewards(sender, contract, msg)
            }
            ContractKind::Adapter => Err(call_reverted(
                *contract,
                "adapters are stateless and have no entry points",
            )),
            ContractKind::Router => {
                let msg: RouterExecuteMsg = parse(contract, msg)?;
                self.execute_router(contract, msg)
            }
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(contract: &Address, msg: &Binary) -> ChainResult<T> {
    from_json(msg).map_err(|e| call_reverted(*contract, format!("unrecognized message: {e}")))
}
