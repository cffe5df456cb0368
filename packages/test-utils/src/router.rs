// The "TestDeFiAdapter" router: holds the position and executes whatever call
// sequence the adapter generates for it, as itself.

use adapter_interface::{RouterExecuteMsg, RouterQueryMsg};
use alloy::primitives::Address;
use chain_client::error::ChainResult;
use cosmwasm_std::{from_json, to_json_binary, Binary};

use crate::adapter::{AdapterCodeQueryMsg, EncodedCall};
use crate::ledger::Ledger;

impl Ledger {
    pub(crate) fn query_router(&self, msg: &RouterQueryMsg) -> ChainResult<Binary> {
        match msg {
            RouterQueryMsg::GetErc20TokenBalance { token, holder } => {
                Ok(to_json_binary(&self.token(token)?.balance_of(holder))?)
            }
        }
    }

    pub(crate) fn execute_router(
        &mut self,
        router: &Address,
        msg: RouterExecuteMsg,
    ) -> ChainResult<()> {
        let (adapter, codes_msg) = match msg {
            RouterExecuteMsg::TestGetDepositAllCodes {
                underlying_token,
                liquidity_pool,
                adapter,
            } => (
                adapter,
                AdapterCodeQueryMsg::GetDepositAllCodes {
                    vault: *router,
                    underlying_token,
                    liquidity_pool,
                },
            ),
            RouterExecuteMsg::TestGetWithdrawAllCodes {
                underlying_token,
                liquidity_pool,
                adapter,
            } => (
                adapter,
                AdapterCodeQueryMsg::GetWithdrawAllCodes {
                    vault: *router,
                    underlying_token,
                    liquidity_pool,
                },
            ),
            RouterExecuteMsg::TestClaimRewardTokenCode {
                liquidity_pool,
                adapter,
            } => (
                adapter,
                AdapterCodeQueryMsg::GetClaimRewardTokenCode {
                    vault: *router,
                    liquidity_pool,
                },
            ),
        };

        let codes: Vec<EncodedCall> =
            from_json(self.query(&adapter, &to_json_binary(&codes_msg)?)?)?;
        for call in codes {
            self.execute(router, &call.target, &call.msg)?;
        }
        Ok(())
    }
}
