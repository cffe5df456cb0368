use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint256};

use crate::abi::{json, uint_json, EvmCall, EvmQuery, IAdapter, ITestDeFiAdapter};
use crate::error::AbiError;

/// Read-only views every adapter exposes over a (pool, underlying token) pair.
#[cw_serde]
#[derive(QueryResponses)]
pub enum AdapterQueryMsg {
    /// Liquidity pool token (share / staked balance) held by `holder`.
    /// The second argument is unused by the adapters and only keeps the ABI shape.
    #[returns(Uint256)]
    GetLiquidityPoolTokenBalance {
        #[schemars(with = "String")]
        holder: Address,
        #[schemars(with = "String")]
        placeholder: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
    },

    /// Underlying tokens accepted by the pool
    #[returns(Vec<String>)]
    GetUnderlyingTokens {
        #[schemars(with = "String")]
        liquidity_pool: Address,
        #[schemars(with = "String")]
        lp_token: Address,
    },

    /// Whole position of `holder` valued in the underlying token
    #[returns(Uint256)]
    GetAllAmountInToken {
        #[schemars(with = "String")]
        holder: Address,
        #[schemars(with = "String")]
        underlying_token: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
    },

    /// Reward token paid by the pool, or the zero address when there is none
    #[returns(String)]
    GetRewardToken {
        #[schemars(with = "String")]
        liquidity_pool: Address,
    },

    /// Rewards accrued by `holder` and not claimed yet
    #[returns(Uint256)]
    GetUnclaimedRewardTokenAmount {
        #[schemars(with = "String")]
        holder: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
        #[schemars(with = "String")]
        underlying_token: Address,
    },
}

impl EvmCall for AdapterQueryMsg {
    fn signature(&self) -> &'static str {
        match self {
            AdapterQueryMsg::GetLiquidityPoolTokenBalance { .. } => {
                IAdapter::getLiquidityPoolTokenBalanceCall::SIGNATURE
            }
            AdapterQueryMsg::GetUnderlyingTokens { .. } => {
                IAdapter::getUnderlyingTokensCall::SIGNATURE
            }
            AdapterQueryMsg::GetAllAmountInToken { .. } => {
                IAdapter::getAllAmountInTokenCall::SIGNATURE
            }
            AdapterQueryMsg::GetRewardToken { .. } => IAdapter::getRewardTokenCall::SIGNATURE,
            AdapterQueryMsg::GetUnclaimedRewardTokenAmount { .. } => {
                IAdapter::getUnclaimedRewardTokenAmountCall::SIGNATURE
            }
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            AdapterQueryMsg::GetLiquidityPoolTokenBalance {
                holder,
                placeholder,
                liquidity_pool,
            } => IAdapter::getLiquidityPoolTokenBalanceCall {
                holder: *holder,
                placeholder: *placeholder,
                liquidityPool: *liquidity_pool,
            }
            .abi_encode(),
            AdapterQueryMsg::GetUnderlyingTokens {
                liquidity_pool,
                lp_token,
            } => IAdapter::getUnderlyingTokensCall {
                liquidityPool: *liquidity_pool,
                lpToken: *lp_token,
            }
            .abi_encode(),
            AdapterQueryMsg::GetAllAmountInToken {
                holder,
                underlying_token,
                liquidity_pool,
            } => IAdapter::getAllAmountInTokenCall {
                holder: *holder,
                underlyingToken: *underlying_token,
                liquidityPool: *liquidity_pool,
            }
            .abi_encode(),
            AdapterQueryMsg::GetRewardToken { liquidity_pool } => IAdapter::getRewardTokenCall {
                liquidityPool: *liquidity_pool,
            }
            .abi_encode(),
            AdapterQueryMsg::GetUnclaimedRewardTokenAmount {
                holder,
                liquidity_pool,
                underlying_token,
            } => IAdapter::getUnclaimedRewardTokenAmountCall {
                holder: *holder,
                liquidityPool: *liquidity_pool,
                underlyingToken: *underlying_token,
            }
            .abi_encode(),
        }
    }
}

impl EvmQuery for AdapterQueryMsg {
    fn decode_returns(&self, data: &[u8]) -> Result<Binary, AbiError> {
        match self {
            AdapterQueryMsg::GetLiquidityPoolTokenBalance { .. } => uint_json(
                IAdapter::getLiquidityPoolTokenBalanceCall::abi_decode_returns(data, true)?._0,
            ),
            AdapterQueryMsg::GetUnderlyingTokens { .. } => {
                json(&IAdapter::getUnderlyingTokensCall::abi_decode_returns(data, true)?._0)
            }
            AdapterQueryMsg::GetAllAmountInToken { .. } => uint_json(
                IAdapter::getAllAmountInTokenCall::abi_decode_returns(data, true)?._0,
            ),
            AdapterQueryMsg::GetRewardToken { .. } => {
                json(&IAdapter::getRewardTokenCall::abi_decode_returns(data, true)?._0)
            }
            AdapterQueryMsg::GetUnclaimedRewardTokenAmount { .. } => uint_json(
                IAdapter::getUnclaimedRewardTokenAmountCall::abi_decode_returns(data, true)?._0,
            ),
        }
    }
}

/// Action entry points of the test router ("TestDeFiAdapter"). Each one asks the
/// adapter for its call sequence and executes it with the router as the holder.
#[cw_serde]
pub enum RouterExecuteMsg {
    /// Stake the router's whole underlying balance
    TestGetDepositAllCodes {
        #[schemars(with = "String")]
        underlying_token: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
        #[schemars(with = "String")]
        adapter: Address,
    },

    /// Unwind the router's whole position
    TestGetWithdrawAllCodes {
        #[schemars(with = "String")]
        underlying_token: Address,
        #[schemars(with = "String")]
        liquidity_pool: Address,
        #[schemars(with = "String")]
        adapter: Address,
    },

    /// Pull accrued rewards into the router
    TestClaimRewardTokenCode {
        #[schemars(with = "String")]
        liquidity_pool: Address,
        #[schemars(with = "String")]
        adapter: Address,
    },
}

impl EvmCall for RouterExecuteMsg {
    fn signature(&self) -> &'static str {
        match self {
            RouterExecuteMsg::TestGetDepositAllCodes { .. } => {
                ITestDeFiAdapter::testGetDepositAllCodesCall::SIGNATURE
            }
            RouterExecuteMsg::TestGetWithdrawAllCodes { .. } => {
                ITestDeFiAdapter::testGetWithdrawAllCodesCall::SIGNATURE
            }
            RouterExecuteMsg::TestClaimRewardTokenCode { .. } => {
                ITestDeFiAdapter::testClaimRewardTokenCodeCall::SIGNATURE
            }
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            RouterExecuteMsg::TestGetDepositAllCodes {
                underlying_token,
                liquidity_pool,
                adapter,
            } => ITestDeFiAdapter::testGetDepositAllCodesCall {
                underlyingToken: *underlying_token,
                liquidityPool: *liquidity_pool,
                adapter: *adapter,
            }
            .abi_encode(),
            RouterExecuteMsg::TestGetWithdrawAllCodes {
                underlying_token,
                liquidity_pool,
                adapter,
            } => ITestDeFiAdapter::testGetWithdrawAllCodesCall {
                underlyingToken: *underlying_token,
                liquidityPool: *liquidity_pool,
                adapter: *adapter,
            }
            .abi_encode(),
            RouterExecuteMsg::TestClaimRewardTokenCode {
                liquidity_pool,
                adapter,
            } => ITestDeFiAdapter::testClaimRewardTokenCodeCall {
                liquidityPool: *liquidity_pool,
                adapter: *adapter,
            }
            .abi_encode(),
        }
    }
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum RouterQueryMsg {
    #[returns(Uint256)]
    GetErc20TokenBalance {
        #[schemars(with = "String")]
        token: Address,
        #[schemars(with = "String")]
        holder: Address,
    },
}

impl EvmCall for RouterQueryMsg {
    fn signature(&self) -> &'static str {
        match self {
            RouterQueryMsg::GetErc20TokenBalance { .. } => {
                ITestDeFiAdapter::getERC20TokenBalanceCall::SIGNATURE
            }
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            RouterQueryMsg::GetErc20TokenBalance { token, holder } => {
                ITestDeFiAdapter::getERC20TokenBalanceCall {
                    token: *token,
                    holder: *holder,
                }
                .abi_encode()
            }
        }
    }
}

impl EvmQuery for RouterQueryMsg {
    fn decode_returns(&self, data: &[u8]) -> Result<Binary, AbiError> {
        match self {
            RouterQueryMsg::GetErc20TokenBalance { .. } => uint_json(
                ITestDeFiAdapter::getERC20TokenBalanceCall::abi_decode_returns(data, true)?._0,
            ),
        }
    }
}
