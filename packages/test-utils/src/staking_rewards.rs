// Synthetix-style staking rewards pool as deployed by Pangolin. Time is measured in
// blocks instead of seconds: every mined block emits `reward_rate` reward tokens
// shared pro rata between stakers.

use std::collections::BTreeMap;

use adapter_interface::{StakingRewardsExecuteMsg, StakingRewardsQueryMsg};
use alloy::primitives::Address;
use chain_client::error::{call_reverted, ChainResult};
use cosmwasm_std::{to_json_binary, Binary, Uint256};

use crate::ledger::Ledger;

const PRECISION: u128 = 1_000_000_000_000_000_000;

#[derive(Clone, Debug)]
pub struct StakingRewardsState {
    pub address: Address,
    pub staking_token: Address,
    pub rewards_token: Address,
    /// Reward tokens emitted per block
    pub reward_rate: Uint256,
    /// Last block that emits rewards
    pub period_finish: u64,
    pub last_update_block: u64,
    pub reward_per_token_stored: Uint256,
    pub total_supply: Uint256,
    balances: BTreeMap<Address, Uint256>,
    user_reward_per_token_paid: BTreeMap<Address, Uint256>,
    rewards: BTreeMap<Address, Uint256>,
}

impl StakingRewardsState {
    pub fn new(
        address: Address,
        staking_token: Address,
        rewards_token: Address,
        reward_rate: Uint256,
        start_block: u64,
    ) -> Self {
        Self {
            address,
            staking_token,
            rewards_token,
            reward_rate,
            period_finish: u64::MAX,
            last_update_block: start_block,
            reward_per_token_stored: Uint256::zero(),
            total_supply: Uint256::zero(),
            balances: BTreeMap::new(),
            user_reward_per_token_paid: BTreeMap::new(),
            rewards: BTreeMap::new(),
        }
    }

    pub fn balance_of(&self, account: &Address) -> Uint256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn last_block_reward_applicable(&self, block: u64) -> u64 {
        block.min(self.period_finish)
    }

    pub fn reward_per_token(&self, block: u64) -> ChainResult<Uint256> {
        if self.total_supply.is_zero() {
            return Ok(self.reward_per_token_stored);
        }
        let elapsed = self
            .last_block_reward_applicable(block)
            .saturating_sub(self.last_update_block);
        let accrued = Uint256::from(elapsed)
            .checked_mul(self.reward_rate)?
            .checked_mul(Uint256::from(PRECISION))?
            .checked_div(self.total_supply)?;
        Ok(self.reward_per_token_stored.checked_add(accrued)?)
    }

    pub fn earned(&self, account: &Address, block: u64) -> ChainResult<Uint256> {
        let paid = self
            .user_reward_per_token_paid
            .get(account)
            .copied()
            .unwrap_or_default();
        let pending = self
            .balance_of(account)
            .checked_mul(self.reward_per_token(block)?.checked_sub(paid)?)?
            .checked_div(Uint256::from(PRECISION))?;
        let stored = self.rewards.get(account).copied().unwrap_or_default();
        Ok(pending.checked_add(stored)?)
    }

    fn update_reward(&mut self, account: &Address, block: u64) -> ChainResult<()> {
        self.reward_per_token_stored = self.reward_per_token(block)?;
        self.last_update_block = self.last_block_reward_applicable(block);
        let earned = self.earned(account, block)?;
        self.rewards.insert(*account, earned);
        self.user_reward_per_token_paid
            .insert(*account, self.reward_per_token_stored);
        Ok(())
    }

    fn add_stake(&mut self, account: &Address, amount: Uint256, block: u64) -> ChainResult<()> {
        if amount.is_zero() {
            return Err(call_reverted(self.address, "Cannot stake 0"));
        }
        self.update_reward(account, block)?;
        self.total_supply = self.total_supply.checked_add(amount)?;
        let balance = self.balance_of(account).checked_add(amount)?;
        self.balances.insert(*account, balance);
        Ok(())
    }

    fn remove_stake(
        &mut self,
        account: &Address,
        amount: Uint256,
        block: u64,
    ) -> ChainResult<()> {
        if amount.is_zero() {
            return Err(call_reverted(self.address, "Cannot withdraw 0"));
        }
        self.update_reward(account, block)?;
        let balance = self.balance_of(account);
        if balance < amount {
            return Err(call_reverted(self.address, "withdraw amount exceeds stake"));
        }
        self.total_supply = self.total_supply.checked_sub(amount)?;
        self.balances.insert(*account, balance - amount);
        Ok(())
    }

    fn take_reward(&mut self, account: &Address, block: u64) -> ChainResult<Uint256> {
        self.update_reward(account, block)?;
        let reward = self.rewards.remove(account).unwrap_or_default();
        Ok(reward)
    }

    pub fn query(&self, msg: &StakingRewardsQueryMsg, block: u64) -> ChainResult<Binary> {
        let response = match msg {
            StakingRewardsQueryMsg::BalanceOf { account } => {
                to_json_binary(&self.balance_of(account))?
            }
            StakingRewardsQueryMsg::TotalSupply {} => to_json_binary(&self.total_supply)?,
            StakingRewardsQueryMsg::Earned { account } => {
                to_json_binary(&self.earned(account, block)?)?
            }
            StakingRewardsQueryMsg::RewardsToken {} => to_json_binary(&self.rewards_token)?,
            StakingRewardsQueryMsg::StakingToken {} => to_json_binary(&self.staking_token)?,
        };
        Ok(response)
    }
}

impl Ledger {
    pub(crate) fn execute_staking_rewards(
        &mut self,
        sender: &Address,
        pool: &Address,
        msg: StakingRewardsExecuteMsg,
    ) -> ChainResult<()> {
        match msg {
            StakingRewardsExecuteMsg::Stake { amount } => self.stake(sender, pool, amount),
            StakingRewardsExecuteMsg::Withdraw { amount } => self.unstake(sender, pool, amount),
            StakingRewardsExecuteMsg::GetReward {} => self.claim_reward(sender, pool),
            StakingRewardsExecuteMsg::Exit {} => {
                let staked = self.staking_rewards(pool)?.balance_of(sender);
                self.unstake(sender, pool, staked)?;
                self.claim_reward(sender, pool)
            }
        }
    }

    pub(crate) fn stake(
        &mut self,
        sender: &Address,
        pool: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let block = self.block;
        let state = self.staking_rewards_mut(pool)?;
        state.add_stake(sender, amount, block)?;
        let staking_token = state.staking_token;
        self.token_mut(&staking_token)?
            .transfer_from(pool, sender, pool, amount)
    }

    fn unstake(&mut self, sender: &Address, pool: &Address, amount: Uint256) -> ChainResult<()> {
        let block = self.block;
        let state = self.staking_rewards_mut(pool)?;
        state.remove_stake(sender, amount, block)?;
        let staking_token = state.staking_token;
        self.token_mut(&staking_token)?.transfer(pool, sender, amount)
    }

    fn claim_reward(&mut self, sender: &Address, pool: &Address) -> ChainResult<()> {
        let block = self.block;
        let state = self.staking_rewards_mut(pool)?;
        let reward = state.take_reward(sender, block)?;
        let rewards_token = state.rewards_token;
        if reward.is_zero() {
            return Ok(());
        }
        self.token_mut(&rewards_token)?.transfer(pool, sender, reward)
    }
}
