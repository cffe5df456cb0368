use std::collections::BTreeMap;

use adapter_interface::{Erc20ExecuteMsg, Erc20QueryMsg};
use alloy::primitives::Address;
use chain_client::error::{call_reverted, ChainResult};
use cosmwasm_std::{to_json_binary, Binary, Uint256};

/// Balances and allowances of a mock ERC-20 token. Share vaults embed one for
/// their share token.
#[derive(Clone, Debug)]
pub struct Erc20State {
    pub address: Address,
    pub decimals: u8,
    pub total_supply: Uint256,
    balances: BTreeMap<Address, Uint256>,
    // (owner, spender) -> amount
    allowances: BTreeMap<(Address, Address), Uint256>,
}

impl Erc20State {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            total_supply: Uint256::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn balance_of(&self, account: &Address) -> Uint256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Uint256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn mint(&mut self, to: &Address, amount: Uint256) -> ChainResult<()> {
        self.total_supply = self.total_supply.checked_add(amount)?;
        let balance = self.balance_of(to).checked_add(amount)?;
        self.balances.insert(*to, balance);
        Ok(())
    }

    pub fn burn(&mut self, from: &Address, amount: Uint256) -> ChainResult<()> {
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(call_reverted(self.address, "ERC20: burn amount exceeds balance"));
        }
        self.balances.insert(*from, balance - amount);
        self.total_supply = self.total_supply.checked_sub(amount)?;
        Ok(())
    }

    /// Overwrites a balance the way a storage write would, keeping the supply consistent.
    pub fn set_balance(&mut self, holder: &Address, amount: Uint256) -> ChainResult<()> {
        let previous = self.balance_of(holder);
        self.total_supply = self.total_supply.checked_sub(previous)?.checked_add(amount)?;
        self.balances.insert(*holder, amount);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(call_reverted(
                self.address,
                "ERC20: transfer amount exceeds balance",
            ));
        }
        self.balances.insert(*from, from_balance - amount);
        let to_balance = self.balance_of(to).checked_add(amount)?;
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Uint256) {
        self.allowances.insert((*owner, *spender), amount);
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            return Err(call_reverted(
                self.address,
                "ERC20: transfer amount exceeds allowance",
            ));
        }
        // infinite approvals are never decreased
        if allowance != Uint256::MAX {
            self.allowances
                .insert((*owner, *spender), allowance - amount);
        }
        self.transfer(owner, to, amount)
    }

    pub fn query(&self, msg: &Erc20QueryMsg) -> ChainResult<Binary> {
        let response = match msg {
            Erc20QueryMsg::BalanceOf { account } => to_json_binary(&self.balance_of(account))?,
            Erc20QueryMsg::TotalSupply {} => to_json_binary(&self.total_supply)?,
            Erc20QueryMsg::Decimals {} => to_json_binary(&self.decimals)?,
        };
        Ok(response)
    }

    pub fn execute(&mut self, sender: &Address, msg: Erc20ExecuteMsg) -> ChainResult<()> {
        match msg {
            Erc20ExecuteMsg::Transfer { recipient, amount } => {
                self.transfer(sender, &recipient, amount)
            }
            Erc20ExecuteMsg::Approve { spender, amount } => {
                self.approve(sender, &spender, amount);
                Ok(())
            }
            Erc20ExecuteMsg::TransferFrom {
                owner,
                recipient,
                amount,
            } => self.transfer_from(sender, &owner, &recipient, amount),
        }
    }
}
