// Solidity surface of the contracts this workspace talks to, and the bridge between
// the JSON messages used by the simulated chain and ABI calldata sent to a node.

use alloy::primitives::U256;
use alloy::sol;
use cosmwasm_std::{to_json_binary, Binary, Uint256};
use serde::Serialize;

use crate::error::AbiError;

sol! {
    interface IAdapter {
        function getLiquidityPoolTokenBalance(address holder, address placeholder, address liquidityPool) external view returns (uint256);
        function getUnderlyingTokens(address liquidityPool, address lpToken) external view returns (address[] memory);
        function getAllAmountInToken(address holder, address underlyingToken, address liquidityPool) external view returns (uint256);
        function getRewardToken(address liquidityPool) external view returns (address);
        function getUnclaimedRewardTokenAmount(address holder, address liquidityPool, address underlyingToken) external view returns (uint256);
    }

    interface ITestDeFiAdapter {
        function testGetDepositAllCodes(address underlyingToken, address liquidityPool, address adapter) external;
        function testGetWithdrawAllCodes(address underlyingToken, address liquidityPool, address adapter) external;
        function testClaimRewardTokenCode(address liquidityPool, address adapter) external;
        function getERC20TokenBalance(address token, address holder) external view returns (uint256);
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function decimals() external view returns (uint8);
        function transfer(address recipient, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address sender, address recipient, uint256 amount) external returns (bool);
    }

    interface ISushiBar {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function sushi() external view returns (address);
        function enter(uint256 amount) external;
        function leave(uint256 share) external;
    }

    interface IStakingRewards {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function earned(address account) external view returns (uint256);
        function rewardsToken() external view returns (address);
        function stakingToken() external view returns (address);
        function stake(uint256 amount) external;
        function withdraw(uint256 amount) external;
        function getReward() external;
        function exit() external;
    }
}

/// A contract message that can be sent either as JSON (simulated chain) or as
/// ABI calldata (EVM node).
pub trait EvmCall: Serialize {
    /// Canonical Solidity signature, e.g. `getRewardToken(address)`.
    fn signature(&self) -> &'static str;

    /// Selector followed by the encoded arguments.
    fn calldata(&self) -> Vec<u8>;
}

/// A read-only call whose ABI return data can be turned into the JSON response the
/// simulated chain would have produced for the same message.
pub trait EvmQuery: EvmCall {
    fn decode_returns(&self, data: &[u8]) -> Result<Binary, AbiError>;
}

pub fn to_u256(value: Uint256) -> U256 {
    U256::from_be_bytes(value.to_be_bytes())
}

pub fn from_u256(value: U256) -> Uint256 {
    Uint256::from_be_bytes(value.to_be_bytes::<32>())
}

pub(crate) fn uint_json(value: U256) -> Result<Binary, AbiError> {
    Ok(to_json_binary(&from_u256(value))?)
}

pub(crate) fn json<T: Serialize>(value: &T) -> Result<Binary, AbiError> {
    Ok(to_json_binary(value)?)
}
