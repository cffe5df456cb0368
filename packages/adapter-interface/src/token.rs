use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint256};

use crate::abi::{json, to_u256, uint_json, EvmCall, EvmQuery, IERC20};
use crate::error::AbiError;

#[cw_serde]
#[derive(QueryResponses)]
pub enum Erc20QueryMsg {
    #[returns(Uint256)]
    BalanceOf {
        #[schemars(with = "String")]
        account: Address,
    },

    #[returns(Uint256)]
    TotalSupply {},

    #[returns(u8)]
    Decimals {},
}

impl EvmCall for Erc20QueryMsg {
    fn signature(&self) -> &'static str {
        match self {
            Erc20QueryMsg::BalanceOf { .. } => IERC20::balanceOfCall::SIGNATURE,
            Erc20QueryMsg::TotalSupply {} => IERC20::totalSupplyCall::SIGNATURE,
            Erc20QueryMsg::Decimals {} => IERC20::decimalsCall::SIGNATURE,
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            Erc20QueryMsg::BalanceOf { account } => {
                IERC20::balanceOfCall { account: *account }.abi_encode()
            }
            Erc20QueryMsg::TotalSupply {} => IERC20::totalSupplyCall {}.abi_encode(),
            Erc20QueryMsg::Decimals {} => IERC20::decimalsCall {}.abi_encode(),
        }
    }
}

impl EvmQuery for Erc20QueryMsg {
    fn decode_returns(&self, data: &[u8]) -> Result<Binary, AbiError> {
        match self {
            Erc20QueryMsg::BalanceOf { .. } => {
                uint_json(IERC20::balanceOfCall::abi_decode_returns(data, true)?._0)
            }
            Erc20QueryMsg::TotalSupply {} => {
                uint_json(IERC20::totalSupplyCall::abi_decode_returns(data, true)?._0)
            }
            Erc20QueryMsg::Decimals {} => {
                json(&IERC20::decimalsCall::abi_decode_returns(data, true)?._0)
            }
        }
    }
}

#[cw_serde]
pub enum Erc20ExecuteMsg {
    Transfer {
        #[schemars(with = "String")]
        recipient: Address,
        amount: Uint256,
    },
    Approve {
        #[schemars(with = "String")]
        spender: Address,
        amount: Uint256,
    },
    TransferFrom {
        #[schemars(with = "String")]
        owner: Address,
        #[schemars(with = "String")]
        recipient: Address,
        amount: Uint256,
    },
}

impl EvmCall for Erc20ExecuteMsg {
    fn signature(&self) -> &'static str {
        match self {
            Erc20ExecuteMsg::Transfer { .. } => IERC20::transferCall::SIGNATURE,
            Erc20ExecuteMsg::Approve { .. } => IERC20::approveCall::SIGNATURE,
            Erc20ExecuteMsg::TransferFrom { .. } => IERC20::transferFromCall::SIGNATURE,
        }
    }

    fn calldata(&self) -> Vec<u8> {
        match self {
            Erc20ExecuteMsg::Transfer { recipient, amount } => IERC20::transferCall {
                recipient: *recipient,
                amount: to_u256(*amount),
            }
            .abi_encode(),
            Erc20ExecuteMsg::Approve { spender, amount } => IERC20::approveCall {
                spender: *spender,
                amount: to_u256(*amount),
            }
            .abi_encode(),
            Erc20ExecuteMsg::TransferFrom {
                owner,
                recipient,
                amount,
            } => IERC20::transferFromCall {
                sender: *owner,
                recipient: *recipient,
                amount: to_u256(*amount),
            }
            .abi_encode(),
        }
    }
}
