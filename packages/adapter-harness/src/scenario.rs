use std::fmt;
use std::time::{Duration, Instant};

use adapter_interface::{AdapterQueryMsg, Erc20QueryMsg, RouterExecuteMsg, RouterQueryMsg};
use alloy::primitives::Address;
use chain_client::ChainBackend;
use cosmwasm_std::Uint256;
use pool_registry::PoolItem;

use crate::error::HarnessError;
use crate::protocol::Protocol;
use crate::signers::Signers;

pub const DEFAULT_SCENARIO_TIMEOUT: Duration = Duration::from_secs(100);

/// Whole tokens the router is seeded with before depositing.
pub const SEED_UNITS: u128 = 200;

/// The points of a scenario at which the chain is touched or a view is compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Checkpoint {
    SeedBalance,
    DepositAll,
    LpBalanceAfterDeposit,
    UnderlyingBalanceAfterDeposit,
    AmountInToken,
    RewardToken,
    UnclaimedReward,
    ClaimReward,
    RewardBalanceAfterClaim,
    WithdrawAll,
    LpBalanceAfterWithdraw,
    UnderlyingBalanceAfterWithdraw,
    PrincipalReturned,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Checkpoint::SeedBalance => "seed balance",
            Checkpoint::DepositAll => "deposit all",
            Checkpoint::LpBalanceAfterDeposit => "LP token balance after deposit",
            Checkpoint::UnderlyingBalanceAfterDeposit => "underlying balance after deposit",
            Checkpoint::AmountInToken => "amount in token",
            Checkpoint::RewardToken => "reward token",
            Checkpoint::UnclaimedReward => "unclaimed reward",
            Checkpoint::ClaimReward => "claim reward",
            Checkpoint::RewardBalanceAfterClaim => "reward balance after claim",
            Checkpoint::WithdrawAll => "withdraw all",
            Checkpoint::LpBalanceAfterWithdraw => "LP token balance after withdraw",
            Checkpoint::UnderlyingBalanceAfterWithdraw => "underlying balance after withdraw",
            Checkpoint::PrincipalReturned => "principal returned",
        };
        f.write_str(name)
    }
}

/// Values observed by a scenario that ran to the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioReport {
    pub pool: String,
    pub seeded: Uint256,
    pub lp_balance_after_deposit: Uint256,
    pub underlying_after_deposit: Uint256,
    pub amount_in_token: Uint256,
    pub reward_token: Address,
    pub unclaimed_reward: Option<Uint256>,
    pub reward_balance_after_claim: Option<Uint256>,
    pub lp_balance_after_withdraw: Uint256,
    pub underlying_after_withdraw: Uint256,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// The pool is deprecated; nothing was sent to the chain
    Skipped,
    Completed(ScenarioReport),
}

struct Deadline {
    started: Instant,
    timeout: Duration,
}

impl Deadline {
    fn start(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
        }
    }

    fn check(&self, checkpoint: Checkpoint) -> Result<(), HarnessError> {
        if self.started.elapsed() >= self.timeout {
            return Err(HarnessError::Timeout {
                checkpoint,
                seconds: self.timeout.as_secs(),
            });
        }
        Ok(())
    }
}

fn ensure_eq<T>(checkpoint: Checkpoint, expected: T, actual: T) -> Result<(), HarnessError>
where
    T: PartialEq + fmt::Display,
{
    if expected != actual {
        return Err(HarnessError::Mismatch {
            checkpoint,
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    tracing::debug!(%checkpoint, value = %actual, "checkpoint passed");
    Ok(())
}

/// `SEED_UNITS` whole tokens of a token with `decimals` decimals.
pub fn seed_amount(decimals: u8) -> Result<Uint256, HarnessError> {
    Ok(Uint256::from(10u128)
        .checked_pow(u32::from(decimals))?
        .checked_mul(Uint256::from(SEED_UNITS))?)
}

/// The life cycle of one position: deposit through the adapter, compare every
/// adapter view with the pool's own accounting, claim, withdraw.
pub struct Scenario<'a, B: ChainBackend> {
    pub chain: &'a B,
    pub signers: &'a Signers,
    pub adapter: Address,
    pub router: Address,
    pub protocol: Protocol,
    pub timeout: Duration,
}

impl<B: ChainBackend> Scenario<'_, B> {
    pub fn run(&self, name: &str, pool: &PoolItem) -> Result<ScenarioOutcome, HarnessError> {
        let _span = tracing::info_span!("scenario", pool = name).entered();

        if pool.is_deprecated() {
            tracing::info!("pool is deprecated, skipping");
            return Ok(ScenarioOutcome::Skipped);
        }
        let underlying_token = pool
            .underlying_token()
            .ok_or_else(|| HarnessError::NoUnderlyingToken {
                pool: name.to_string(),
            })?;
        let deadline = Deadline::start(self.timeout);

        deadline.check(Checkpoint::SeedBalance)?;
        let decimals: u8 = self
            .chain
            .query(&underlying_token, &Erc20QueryMsg::Decimals {})?;
        let seeded = seed_amount(decimals)?;
        self.chain
            .seed_balance(&underlying_token, &self.router, seeded)?;

        deadline.check(Checkpoint::DepositAll)?;
        self.chain.execute(
            &self.signers.deployer,
            &self.router,
            &RouterExecuteMsg::TestGetDepositAllCodes {
                underlying_token,
                liquidity_pool: pool.pool,
                adapter: self.adapter,
            },
        )?;

        deadline.check(Checkpoint::LpBalanceAfterDeposit)?;
        let lp_balance_after_deposit =
            self.check_lp_balance(Checkpoint::LpBalanceAfterDeposit, pool)?;

        deadline.check(Checkpoint::UnderlyingBalanceAfterDeposit)?;
        let underlying_after_deposit = self.check_underlying_balance(
            Checkpoint::UnderlyingBalanceAfterDeposit,
            name,
            pool,
            &underlying_token,
        )?;

        deadline.check(Checkpoint::AmountInToken)?;
        let amount_in_token: Uint256 = self.chain.query(
            &self.adapter,
            &AdapterQueryMsg::GetAllAmountInToken {
                holder: self.router,
                underlying_token,
                liquidity_pool: pool.pool,
            },
        )?;
        let expected =
            self.protocol
                .valuation(self.chain, pool, &underlying_token, &self.router)?;
        ensure_eq(Checkpoint::AmountInToken, expected, amount_in_token)?;

        deadline.check(Checkpoint::RewardToken)?;
        let reward_token = self.reward_token(pool)?;
        ensure_eq(
            Checkpoint::RewardToken,
            self.protocol.reward_token(),
            reward_token,
        )?;

        let (unclaimed_reward, reward_balance_after_claim) = if self.protocol.accrues_rewards() {
            deadline.check(Checkpoint::UnclaimedReward)?;
            self.chain.mine_block(&self.signers.admin)?;
            let unclaimed: Uint256 = self.chain.query(
                &self.adapter,
                &AdapterQueryMsg::GetUnclaimedRewardTokenAmount {
                    holder: self.router,
                    liquidity_pool: pool.pool,
                    underlying_token,
                },
            )?;
            let expected = self
                .protocol
                .unclaimed_reward(self.chain, pool, &self.router)?;
            ensure_eq(Checkpoint::UnclaimedReward, expected, unclaimed)?;

            deadline.check(Checkpoint::ClaimReward)?;
            self.chain.execute(
                &self.signers.deployer,
                &self.router,
                &RouterExecuteMsg::TestClaimRewardTokenCode {
                    liquidity_pool: pool.pool,
                    adapter: self.adapter,
                },
            )?;

            deadline.check(Checkpoint::RewardBalanceAfterClaim)?;
            let reward_token = self.reward_token(pool)?;
            let reported: Uint256 = self.chain.query(
                &self.router,
                &RouterQueryMsg::GetErc20TokenBalance {
                    token: reward_token,
                    holder: self.router,
                },
            )?;
            let direct: Uint256 = self.chain.query(
                &reward_token,
                &Erc20QueryMsg::BalanceOf {
                    account: self.router,
                },
            )?;
            ensure_eq(Checkpoint::RewardBalanceAfterClaim, direct, reported)?;

            (Some(unclaimed), Some(reported))
        } else {
            (None, None)
        };

        deadline.check(Checkpoint::WithdrawAll)?;
        self.chain.execute(
            &self.signers.deployer,
            &self.router,
            &RouterExecuteMsg::TestGetWithdrawAllCodes {
                underlying_token,
                liquidity_pool: pool.pool,
                adapter: self.adapter,
            },
        )?;

        deadline.check(Checkpoint::LpBalanceAfterWithdraw)?;
        let lp_balance_after_withdraw =
            self.check_lp_balance(Checkpoint::LpBalanceAfterWithdraw, pool)?;

        deadline.check(Checkpoint::UnderlyingBalanceAfterWithdraw)?;
        let underlying_after_withdraw = self.check_underlying_balance(
            Checkpoint::UnderlyingBalanceAfterWithdraw,
            name,
            pool,
            &underlying_token,
        )?;

        deadline.check(Checkpoint::PrincipalReturned)?;
        if underlying_after_withdraw <= underlying_after_deposit {
            return Err(HarnessError::NoPrincipalReturned {
                checkpoint: Checkpoint::PrincipalReturned,
                post_deposit: underlying_after_deposit.to_string(),
                final_balance: underlying_after_withdraw.to_string(),
            });
        }

        tracing::info!(
            seeded = %seeded,
            returned = %underlying_after_withdraw,
            "scenario completed"
        );
        Ok(ScenarioOutcome::Completed(ScenarioReport {
            pool: name.to_string(),
            seeded,
            lp_balance_after_deposit,
            underlying_after_deposit,
            amount_in_token,
            reward_token,
            unclaimed_reward,
            reward_balance_after_claim,
            lp_balance_after_withdraw,
            underlying_after_withdraw,
        }))
    }

    fn reward_token(&self, pool: &PoolItem) -> Result<Address, HarnessError> {
        Ok(self.chain.query(
            &self.adapter,
            &AdapterQueryMsg::GetRewardToken {
                liquidity_pool: pool.pool,
            },
        )?)
    }

    /// Adapter LP balance view against the pool's balance of the router.
    fn check_lp_balance(
        &self,
        checkpoint: Checkpoint,
        pool: &PoolItem,
    ) -> Result<Uint256, HarnessError> {
        let reported: Uint256 = self.chain.query(
            &self.adapter,
            &AdapterQueryMsg::GetLiquidityPoolTokenBalance {
                holder: self.router,
                placeholder: self.router,
                liquidity_pool: pool.pool,
            },
        )?;
        let expected = self.protocol.lp_balance(self.chain, pool, &self.router)?;
        ensure_eq(checkpoint, expected, reported)?;
        Ok(reported)
    }

    /// Router balance of the adapter's underlying token against the token itself.
    fn check_underlying_balance(
        &self,
        checkpoint: Checkpoint,
        name: &str,
        pool: &PoolItem,
        underlying_token: &Address,
    ) -> Result<Uint256, HarnessError> {
        let adapter_underlying: Vec<Address> = self.chain.query(
            &self.adapter,
            &AdapterQueryMsg::GetUnderlyingTokens {
                liquidity_pool: pool.pool,
                lp_token: pool.pool,
            },
        )?;
        let token = adapter_underlying
            .first()
            .copied()
            .ok_or_else(|| HarnessError::NoUnderlyingToken {
                pool: name.to_string(),
            })?;

        let reported: Uint256 = self.chain.query(
            &self.router,
            &RouterQueryMsg::GetErc20TokenBalance {
                token,
                holder: self.router,
            },
        )?;
        let expected: Uint256 = self.chain.query(
            underlying_token,
            &Erc20QueryMsg::BalanceOf {
                account: self.router,
            },
        )?;
        ensure_eq(checkpoint, expected, reported)?;
        Ok(reported)
    }
}
