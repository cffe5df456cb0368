use adapter_interface::AdapterKind;
use alloy::primitives::{keccak256, Address};
use chain_client::ChainResult;
use cosmwasm_std::Uint256;
use pool_registry::{PoolItem, PoolRegistry};

use crate::chain::SimulatedChain;

/// Decimals of every token materialized on a simulated fork.
pub const FORK_TOKEN_DECIMALS: u8 = 18;

/// Underlying entered into each share vault by the pre-existing liquidity provider.
pub const FORK_VAULT_DEPOSIT: u128 = 1_000_000_000_000_000_000_000_000;

/// Yield already sitting in each share vault, so a share is worth more than one
/// unit of underlying and valuations round.
pub const FORK_VAULT_YIELD: u128 = 234_567_891_234_567_891_234_567;

/// Stake already held by each staking pool.
pub const FORK_STAKE: u128 = 500_000_000_000_000_000_000_000;

/// Reward tokens held by each staking pool to pay claims from.
pub const FORK_REWARD_RESERVE: u128 = 1_000_000_000_000_000_000_000_000;

/// Rewards emitted per block by each staking pool.
pub const FORK_REWARD_RATE: u128 = 10_000_000_000_000_000;

/// The account that owns the pre-existing liquidity of a fork.
pub fn liquidity_provider() -> Address {
    Address::from_word(keccak256(b"simulated fork liquidity provider"))
}

impl SimulatedChain {
    /// A chain on which every pool of `registry` exists at its configured address,
    /// with the tokens it references and some liquidity from another holder.
    pub fn fork_of(kind: AdapterKind, registry: &PoolRegistry) -> ChainResult<Self> {
        let chain = SimulatedChain::new();
        for (name, pool) in registry.iter() {
            tracing::debug!(%kind, pool = name.as_str(), address = %pool.pool, "materializing pool");
            match kind {
                AdapterKind::SushiBar => chain.fork_share_vault(pool)?,
                AdapterKind::PangolinStake => chain.fork_staking_rewards(pool)?,
            }
        }
        Ok(chain)
    }

    fn ensure_token(&self, token: Address) {
        if !self.is_contract(&token) {
            self.create_token_at(token, FORK_TOKEN_DECIMALS);
        }
    }

    fn fork_share_vault(&self, pool: &PoolItem) -> ChainResult<()> {
        for token in &pool.tokens {
            self.ensure_token(*token);
        }
        let underlying = pool.tokens[0];
        self.create_share_vault_at(pool.pool, underlying);

        self.provide_vault_liquidity(
            &pool.pool,
            &liquidity_provider(),
            Uint256::from(FORK_VAULT_DEPOSIT),
        )?;
        self.accrue_vault_yield(&pool.pool, Uint256::from(FORK_VAULT_YIELD))
    }

    fn fork_staking_rewards(&self, pool: &PoolItem) -> ChainResult<()> {
        for token in &pool.tokens {
            self.ensure_token(*token);
        }
        let staking_token = pool.tokens[0];
        let rewards_token = pool.reward_token().unwrap_or(staking_token);
        self.ensure_token(rewards_token);

        self.create_staking_rewards_at(
            pool.pool,
            staking_token,
            rewards_token,
            Uint256::from(FORK_REWARD_RATE),
        );
        self.mint(&rewards_token, &pool.pool, Uint256::from(FORK_REWARD_RESERVE))?;
        self.provide_stake(&pool.pool, &liquidity_provider(), Uint256::from(FORK_STAKE))
    }
}
