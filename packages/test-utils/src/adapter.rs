use adapter_interface::{
    AdapterKind, AdapterQueryMsg, Erc20ExecuteMsg, ShareVaultExecuteMsg, StakingRewardsExecuteMsg,
};
use alloy::primitives::Address;
use chain_client::error::{call_reverted, ChainResult};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, Uint256};
use serde::Serialize;

use crate::ledger::Ledger;

/// Reward token reported by adapters running with [`AdapterFault::WrongRewardToken`].
pub const BOGUS_REWARD_TOKEN: Address = Address::new([0xde; 20]);

/// Misbehaviours that can be switched on for a deployed mock adapter, so harness
/// checkpoints can be shown to catch them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterFault {
    /// `getAllAmountInToken` reports one unit more than the position is worth
    OverstatedValuation,
    /// `getRewardToken` reports [`BOGUS_REWARD_TOKEN`]
    WrongRewardToken,
    /// Deposit code generation reverts
    RevertOnDeposit,
}

#[derive(Clone, Debug)]
pub struct AdapterState {
    pub kind: AdapterKind,
    pub fault: Option<AdapterFault>,
}

impl AdapterState {
    pub fn new(kind: AdapterKind) -> Self {
        Self { kind, fault: None }
    }
}

/// Code generation entry points the router calls on an adapter. `vault` is the
/// address holding the position, i.e. the router itself.
#[cw_serde]
pub enum AdapterCodeQueryMsg {
    GetDepositAllCodes {
        #[schemars(with = "String")]
        vault: Address,
        #[schemars(with = "String")]
        underlying_token: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
    },
    GetWithdrawAllCodes {
        #[schemars(with = "String")]
        vault: Address,
        #[schemars(with = "String")]
        underlying_token: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
    },
    GetClaimRewardTokenCode {
        #[schemars(with = "String")]
        vault: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
    },
}

/// One call of an adapter-generated sequence.
#[cw_serde]
pub struct EncodedCall {
    #[schemars(with = "String")]
    pub target: Address,
    pub msg: Binary,
}

impl EncodedCall {
    pub fn new<M: Serialize>(target: Address, msg: &M) -> ChainResult<Self> {
        Ok(Self {
            target,
            msg: to_json_binary(msg)?,
        })
    }
}

fn approve_and(
    underlying_token: Address,
    liquidity_pool: Address,
    amount: Uint256,
    deposit: EncodedCall,
) -> ChainResult<Vec<EncodedCall>> {
    Ok(vec![
        EncodedCall::new(
            underlying_token,
            &Erc20ExecuteMsg::Approve {
                spender: liquidity_pool,
                amount: Uint256::zero(),
            },
        )?,
        EncodedCall::new(
            underlying_token,
            &Erc20ExecuteMsg::Approve {
                spender: liquidity_pool,
                amount,
            },
        )?,
        deposit,
    ])
}

impl Ledger {
    fn lp_token_balance(
        &self,
        kind: AdapterKind,
        holder: &Address,
        liquidity_pool: &Address,
    ) -> ChainResult<Uint256> {
        match kind {
            AdapterKind::SushiBar => Ok(self.token(liquidity_pool)?.balance_of(holder)),
            AdapterKind::PangolinStake => {
                Ok(self.staking_rewards(liquidity_pool)?.balance_of(holder))
            }
        }
    }

    fn amount_in_token(
        &self,
        kind: AdapterKind,
        holder: &Address,
        underlying_token: &Address,
        liquidity_pool: &Address,
    ) -> ChainResult<Uint256> {
        let shares = self.lp_token_balance(kind, holder, liquidity_pool)?;
        match kind {
            AdapterKind::SushiBar => {
                if shares.is_zero() {
                    return Ok(Uint256::zero());
                }
                let total_underlying = self.token(underlying_token)?.balance_of(liquidity_pool);
                let total_shares = self.token(liquidity_pool)?.total_supply;
                Ok(shares
                    .checked_mul(total_underlying)?
                    .checked_div(total_shares)?)
            }
            AdapterKind::PangolinStake => Ok(shares),
        }
    }

    pub(crate) fn query_adapter(
        &self,
        adapter: &Address,
        msg: &AdapterQueryMsg,
    ) -> ChainResult<Binary> {
        let state = self.adapter(adapter)?;
        let kind = state.kind;
        let fault = state.fault;

        let response = match msg {
            AdapterQueryMsg::GetLiquidityPoolTokenBalance {
                holder,
                liquidity_pool,
                ..
            } => to_json_binary(&self.lp_token_balance(kind, holder, liquidity_pool)?)?,
            AdapterQueryMsg::GetUnderlyingTokens { liquidity_pool, .. } => {
                let underlying = match kind {
                    AdapterKind::SushiBar => self.share_vault(liquidity_pool)?.underlying,
                    AdapterKind::PangolinStake => {
                        self.staking_rewards(liquidity_pool)?.staking_token
                    }
                };
                to_json_binary(&vec![underlying])?
            }
            AdapterQueryMsg::GetAllAmountInToken {
                holder,
                underlying_token,
                liquidity_pool,
            } => {
                let mut amount =
                    self.amount_in_token(kind, holder, underlying_token, liquidity_pool)?;
                if fault == Some(AdapterFault::OverstatedValuation) {
                    amount = amount.checked_add(Uint256::one())?;
                }
                to_json_binary(&amount)?
            }
            AdapterQueryMsg::GetRewardToken { liquidity_pool } => {
                let reward_token = match (fault, kind) {
                    (Some(AdapterFault::WrongRewardToken), _) => BOGUS_REWARD_TOKEN,
                    (_, AdapterKind::SushiBar) => Address::ZERO,
                    (_, AdapterKind::PangolinStake) => {
                        self.staking_rewards(liquidity_pool)?.rewards_token
                    }
                };
                to_json_binary(&reward_token)?
            }
            AdapterQueryMsg::GetUnclaimedRewardTokenAmount {
                holder,
                liquidity_pool,
                ..
            } => {
                let unclaimed = match kind {
                    AdapterKind::SushiBar => Uint256::zero(),
                    AdapterKind::PangolinStake => self
                        .staking_rewards(liquidity_pool)?
                        .earned(holder, self.block)?,
                };
                to_json_binary(&unclaimed)?
            }
        };
        Ok(response)
    }

    pub(crate) fn query_adapter_codes(
        &self,
        adapter: &Address,
        msg: &AdapterCodeQueryMsg,
    ) -> ChainResult<Binary> {
        let state = self.adapter(adapter)?;
        let kind = state.kind;

        let codes = match msg {
            AdapterCodeQueryMsg::GetDepositAllCodes {
                vault,
                underlying_token,
                liquidity_pool,
            } => {
                if state.fault == Some(AdapterFault::RevertOnDeposit) {
                    return Err(call_reverted(*adapter, "deposit disabled"));
                }
                let amount = self.token(underlying_token)?.balance_of(vault);
                if amount.is_zero() {
                    vec![]
                } else {
                    let deposit = match kind {
                        AdapterKind::SushiBar => EncodedCall::new(
                            *liquidity_pool,
                            &ShareVaultExecuteMsg::Enter { amount },
                        )?,
                        AdapterKind::PangolinStake => EncodedCall::new(
                            *liquidity_pool,
                            &StakingRewardsExecuteMsg::Stake { amount },
                        )?,
                    };
                    approve_and(*underlying_token, *liquidity_pool, amount, deposit)?
                }
            }
            AdapterCodeQueryMsg::GetWithdrawAllCodes {
                vault,
                liquidity_pool,
                ..
            } => {
                let amount = self.lp_token_balance(kind, vault, liquidity_pool)?;
                if amount.is_zero() {
                    vec![]
                } else {
                    match kind {
                        AdapterKind::SushiBar => vec![EncodedCall::new(
                            *liquidity_pool,
                            &ShareVaultExecuteMsg::Leave { share: amount },
                        )?],
                        AdapterKind::PangolinStake => vec![EncodedCall::new(
                            *liquidity_pool,
                            &StakingRewardsExecuteMsg::Withdraw { amount },
                        )?],
                    }
                }
            }
            AdapterCodeQueryMsg::GetClaimRewardTokenCode { liquidity_pool, .. } => match kind {
                AdapterKind::SushiBar => vec![],
                AdapterKind::PangolinStake => vec![EncodedCall::new(
                    *liquidity_pool,
                    &StakingRewardsExecuteMsg::GetReward {},
                )?],
            },
        };

        Ok(to_json_binary(&codes)?)
    }
}
