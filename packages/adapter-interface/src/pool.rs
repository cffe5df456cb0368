// Interfaces of the underlying protocol contracts the adapters wrap. These are the
// ground truth the harness compares adapter views against.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint256};

use crate::abi::{json, to_u256, uint_json, EvmCall, EvmQuery, IStakingRewards, ISushiBar};
use crate::error::AbiError;

/// SushiBar-style vault: an ERC-20 share token backed by a growing balance of the
/// underlying token held by the vault itself.
#[cw_serde]
#[derive(QueryResponses)]
pub enum ShareVaultQueryMsg {
    #[returns(Uint256)]
    BalanceOf {
        #[schemars(with = "String")]
        account: Address,
    },

    #[returns(Uint256)]
    TotalSupply {},

    /// The underlying token
    #[returns(String)]
    Sushi {},
}

impl EvmCall for ShareVaultQueryMsg {
    fn signature(&self) -> &'static str {
        match self {
            ShareVaultQueryMsg::BalanceOf { .. } => ISushiBar::balanceOfCall::SIGNATURE,
            ShareVaultQueryMsg::TotalSupply {} => ISushiBar::totalSupplyCall::SIGNATURE,
            ShareVaultQueryMsg::Sushi {} => ISushiBar::sushiCall::SIGNATURE,
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            ShareVaultQueryMsg::BalanceOf { account } => {
                ISushiBar::balanceOfCall { account: *account }.abi_encode()
            }
            ShareVaultQueryMsg::TotalSupply {} => ISushiBar::totalSupplyCall {}.abi_encode(),
            ShareVaultQueryMsg::Sushi {} => ISushiBar::sushiCall {}.abi_encode(),
        }
    }
}

impl EvmQuery for ShareVaultQueryMsg {
    fn decode_returns(&self, data: &[u8]) -> Result<Binary, AbiError> {
        match self {
            ShareVaultQueryMsg::BalanceOf { .. } => {
                uint_json(ISushiBar::balanceOfCall::abi_decode_returns(data, true)?._0)
            }
            ShareVaultQueryMsg::TotalSupply {} => {
                uint_json(ISushiBar::totalSupplyCall::abi_decode_returns(data, true)?._0)
            }
            ShareVaultQueryMsg::Sushi {} => {
                json(&ISushiBar::sushiCall::abi_decode_returns(data, true)?._0)
            }
        }
    }
}

#[cw_serde]
pub enum ShareVaultExecuteMsg {
    /// Lock underlying tokens and mint shares
    Enter { amount: Uint256 },
    /// Burn shares and receive the underlying they represent
    Leave { share: Uint256 },
}

impl EvmCall for ShareVaultExecuteMsg {
    fn signature(&self) -> &'static str {
        match self {
            ShareVaultExecuteMsg::Enter { .. } => ISushiBar::enterCall::SIGNATURE,
            ShareVaultExecuteMsg::Leave { .. } => ISushiBar::leaveCall::SIGNATURE,
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            ShareVaultExecuteMsg::Enter { amount } => ISushiBar::enterCall {
                amount: to_u256(*amount),
            }
            .abi_encode(),
            ShareVaultExecuteMsg::Leave { share } => ISushiBar::leaveCall {
                share: to_u256(*share),
            }
            .abi_encode(),
        }
    }
}

/// Pangolin / Synthetix-style staking rewards farm: stake 1:1, accrue a separate
/// reward token over time.
#[cw_serde]
#[derive(QueryResponses)]
pub enum StakingRewardsQueryMsg {
    #[returns(Uint256)]
    BalanceOf {
        #[schemars(with = "String")]
        account: Address,
    },

    #[returns(Uint256)]
    TotalSupply {},

    #[returns(Uint256)]
    Earned {
        #[schemars(with = "String")]
        account: Address,
    },

    #[returns(String)]
    RewardsToken {},

    #[returns(String)]
    StakingToken {},
}

impl EvmCall for StakingRewardsQueryMsg {
    fn signature(&self) -> &'static str {
        match self {
            StakingRewardsQueryMsg::BalanceOf { .. } => IStakingRewards::balanceOfCall::SIGNATURE,
            StakingRewardsQueryMsg::TotalSupply {} => IStakingRewards::totalSupplyCall::SIGNATURE,
            StakingRewardsQueryMsg::Earned { .. } => IStakingRewards::earnedCall::SIGNATURE,
            StakingRewardsQueryMsg::RewardsToken {} => {
                IStakingRewards::rewardsTokenCall::SIGNATURE
            }
            StakingRewardsQueryMsg::StakingToken {} => {
                IStakingRewards::stakingTokenCall::SIGNATURE
            }
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            StakingRewardsQueryMsg::BalanceOf { account } => {
                IStakingRewards::balanceOfCall { account: *account }.abi_encode()
            }
            StakingRewardsQueryMsg::TotalSupply {} => {
                IStakingRewards::totalSupplyCall {}.abi_encode()
            }
            StakingRewardsQueryMsg::Earned { account } => {
                IStakingRewards::earnedCall { account: *account }.abi_encode()
            }
            StakingRewardsQueryMsg::RewardsToken {} => {
                IStakingRewards::rewardsTokenCall {}.abi_encode()
            }
            StakingRewardsQueryMsg::StakingToken {} => {
                IStakingRewards::stakingTokenCall {}.abi_encode()
            }
        }
    }
}

impl EvmQuery for StakingRewardsQueryMsg {
    fn decode_returns(&self, data: &[u8]) -> Result<Binary, AbiError> {
        match self {
            StakingRewardsQueryMsg::BalanceOf { .. } => {
                uint_json(IStakingRewards::balanceOfCall::abi_decode_returns(data, true)?._0)
            }
            StakingRewardsQueryMsg::TotalSupply {} => {
                uint_json(IStakingRewards::totalSupplyCall::abi_decode_returns(data, true)?._0)
            }
            StakingRewardsQueryMsg::Earned { .. } => {
                uint_json(IStakingRewards::earnedCall::abi_decode_returns(data, true)?._0)
            }
            StakingRewardsQueryMsg::RewardsToken {} => {
                json(&IStakingRewards::rewardsTokenCall::abi_decode_returns(data, true)?._0)
            }
            StakingRewardsQueryMsg::StakingToken {} => {
                json(&IStakingRewards::stakingTokenCall::abi_decode_returns(data, true)?._0)
            }
        }
    }
}

#[cw_serde]
pub enum StakingRewardsExecuteMsg {
    Stake { amount: Uint256 },
    Withdraw { amount: Uint256 },
    GetReward {},
    /// Withdraw everything and claim rewards
    Exit {},
}

impl EvmCall for StakingRewardsExecuteMsg {
    fn signature(&self) -> &'static str {
        match self {
            StakingRewardsExecuteMsg::Stake { .. } => IStakingRewards::stakeCall::SIGNATURE,
            StakingRewardsExecuteMsg::Withdraw { .. } => IStakingRewards::withdrawCall::SIGNATURE,
            StakingRewardsExecuteMsg::GetReward {} => IStakingRewards::getRewardCall::SIGNATURE,
            StakingRewardsExecuteMsg::Exit {} => IStakingRewards::exitCall::SIGNATURE,
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            StakingRewardsExecuteMsg::Stake { amount } => IStakingRewards::stakeCall {
                amount: to_u256(*amount),
            }
            .abi_encode(),
            StakingRewardsExecuteMsg::Withdraw { amount } => IStakingRewards::withdrawCall {
                amount: to_u256(*amount),
            }
            .abi_encode(),
            StakingRewardsExecuteMsg::GetReward {} => IStakingRewards::getRewardCall {}.abi_encode(),
            StakingRewardsExecuteMsg::Exit {} => IStakingRewards::exitCall {}.abi_encode(),
        }
    }
}
