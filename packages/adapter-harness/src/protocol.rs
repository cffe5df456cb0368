use adapter_interface::{AdapterKind, Erc20QueryMsg, ShareVaultQueryMsg, StakingRewardsQueryMsg};
use alloy::primitives::{address, Address};
use chain_client::{ChainBackend, ChainResult};
use cosmwasm_std::Uint256;
use pool_registry::PoolItem;

use crate::error::HarnessError;

/// PNG, the token Pangolin staking pools pay rewards in.
pub const PANGOLIN_REWARD_TOKEN: Address = address!("60781C2586D68229fde47564546784ab3fACA982");

/// How a pool accounts for deposits, and therefore what an adapter's views over it
/// must agree with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    /// Deposits mint shares of a growing pile of underlying; no separate reward token
    ShareVault,
    /// Deposits are staked 1:1 and accrue `reward_token` every block
    StakingRewards { reward_token: Address },
}

impl Protocol {
    pub fn for_adapter(kind: AdapterKind) -> Self {
        match kind {
            AdapterKind::SushiBar => Protocol::ShareVault,
            AdapterKind::PangolinStake => Protocol::StakingRewards {
                reward_token: PANGOLIN_REWARD_TOKEN,
            },
        }
    }

    pub fn accrues_rewards(&self) -> bool {
        matches!(self, Protocol::StakingRewards { .. })
    }

    /// The token rewards are paid in, or the zero address.
    pub fn reward_token(&self) -> Address {
        match self {
            Protocol::ShareVault => Address::ZERO,
            Protocol::StakingRewards { reward_token } => *reward_token,
        }
    }

    /// The pool's own record of `holder`'s share or stake.
    pub fn lp_balance<B: ChainBackend>(
        &self,
        chain: &B,
        pool: &PoolItem,
        holder: &Address,
    ) -> ChainResult<Uint256> {
        match self {
            Protocol::ShareVault => chain.query(
                &pool.pool,
                &ShareVaultQueryMsg::BalanceOf { account: *holder },
            ),
            Protocol::StakingRewards { .. } => chain.query(
                &pool.pool,
                &StakingRewardsQueryMsg::BalanceOf { account: *holder },
            ),
        }
    }

    /// What `holder`'s position is worth in the underlying token, computed from the
    /// pool's state the same way the pool itself rounds.
    pub fn valuation<B: ChainBackend>(
        &self,
        chain: &B,
        pool: &PoolItem,
        underlying_token: &Address,
        holder: &Address,
    ) -> Result<Uint256, HarnessError> {
        let balance = self.lp_balance(chain, pool, holder)?;
        match self {
            Protocol::ShareVault => {
                let total_underlying: Uint256 = chain.query(
                    underlying_token,
                    &Erc20QueryMsg::BalanceOf { account: pool.pool },
                )?;
                let total_shares: Uint256 =
                    chain.query(&pool.pool, &ShareVaultQueryMsg::TotalSupply {})?;
                share_amount_in_token(balance, total_underlying, total_shares)
            }
            Protocol::StakingRewards { .. } => Ok(balance),
        }
    }

    /// Rewards the pool says `holder` can claim.
    pub fn unclaimed_reward<B: ChainBackend>(
        &self,
        chain: &B,
        pool: &PoolItem,
        holder: &Address,
    ) -> ChainResult<Uint256> {
        match self {
            Protocol::ShareVault => Ok(Uint256::zero()),
            Protocol::StakingRewards { .. } => chain.query(
                &pool.pool,
                &StakingRewardsQueryMsg::Earned { account: *holder },
            ),
        }
    }
}

/// `floor(shares * total_underlying / total_shares)`.
///
/// Overflow and an empty share supply are errors rather than a best-effort value.
pub fn share_amount_in_token(
    shares: Uint256,
    total_underlying: Uint256,
    total_shares: Uint256,
) -> Result<Uint256, HarnessError> {
    Ok(shares
        .checked_mul(total_underlying)?
        .checked_div(total_shares)?)
}
