// SushiBar-style vault. Shares are minted against the vault's own balance of the
// underlying token, so anything sent to the vault directly raises the share price.

use adapter_interface::{ShareVaultExecuteMsg, ShareVaultQueryMsg};
use alloy::primitives::Address;
use chain_client::error::{call_reverted, ChainResult};
use cosmwasm_std::{to_json_binary, Binary, Uint256};

use crate::erc20::Erc20State;
use crate::ledger::Ledger;

#[derive(Clone, Debug)]
pub struct ShareVaultState {
    pub shares: Erc20State,
    pub underlying: Address,
}

impl ShareVaultState {
    pub fn new(address: Address, underlying: Address) -> Self {
        Self {
            shares: Erc20State::new(address, 18),
            underlying,
        }
    }
}

impl Ledger {
    fn vault_totals(&self, vault: &Address) -> ChainResult<(Address, Uint256, Uint256)> {
        let state = self.share_vault(vault)?;
        let total_underlying = self.token(&state.underlying)?.balance_of(vault);
        Ok((state.underlying, total_underlying, state.shares.total_supply))
    }

    pub(crate) fn query_share_vault(
        &self,
        vault: &Address,
        msg: &ShareVaultQueryMsg,
    ) -> ChainResult<Binary> {
        let state = self.share_vault(vault)?;
        let response = match msg {
            ShareVaultQueryMsg::BalanceOf { account } => {
                to_json_binary(&state.shares.balance_of(account))?
            }
            ShareVaultQueryMsg::TotalSupply {} => to_json_binary(&state.shares.total_supply)?,
            ShareVaultQueryMsg::Sushi {} => to_json_binary(&state.underlying)?,
        };
        Ok(response)
    }

    pub(crate) fn execute_share_vault(
        &mut self,
        sender: &Address,
        vault: &Address,
        msg: ShareVaultExecuteMsg,
    ) -> ChainResult<()> {
        match msg {
            ShareVaultExecuteMsg::Enter { amount } => self.vault_enter(sender, vault, amount),
            ShareVaultExecuteMsg::Leave { share } => self.vault_leave(sender, vault, share),
        }
    }

    pub(crate) fn vault_enter(
        &mut self,
        sender: &Address,
        vault: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let (underlying, total_underlying, total_shares) = self.vault_totals(vault)?;

        let minted = if total_shares.is_zero() || total_underlying.is_zero() {
            amount
        } else {
            amount
                .checked_mul(total_shares)?
                .checked_div(total_underlying)?
        };

        self.token_mut(vault)?.mint(sender, minted)?;
        self.token_mut(&underlying)?
            .transfer_from(vault, sender, vault, amount)
    }

    pub(crate) fn vault_leave(
        &mut self,
        sender: &Address,
        vault: &Address,
        share: Uint256,
    ) -> ChainResult<()> {
        let (underlying, total_underlying, total_shares) = self.vault_totals(vault)?;
        if total_shares.is_zero() {
            return Err(call_reverted(*vault, "no shares outstanding"));
        }

        let what = share
            .checked_mul(total_underlying)?
            .checked_div(total_shares)?;

        self.token_mut(vault)?.burn(sender, share)?;
        self.token_mut(&underlying)?.transfer(vault, sender, what)
    }
}
