use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use adapter_interface::{AdapterKind, EvmCall, EvmQuery, TEST_DEFI_ADAPTER};
use alloy::primitives::{keccak256, Address};
use chain_client::error::{call_reverted, ChainError, ChainResult};
use chain_client::{ChainBackend, ContractArtifact, TxHash, TxReceipt};
use cosmwasm_std::{from_json, to_json_binary, Binary, Uint256};
use serde::de::DeserializeOwned;

use crate::adapter::{AdapterFault, AdapterState};
use crate::erc20::Erc20State;
use crate::ledger::{Contract, Ledger};
use crate::share_vault::ShareVaultState;
use crate::staking_rewards::StakingRewardsState;
use crate::testing_mocks::{ContractQueryFunc, MockContractQuerier};

pub const ACCOUNT_COUNT: usize = 10;

/// Native balance every simulated account starts with, 10 000 ether.
pub const INITIAL_NATIVE_BALANCE: u128 = 10_000_000_000_000_000_000_000;

const GENESIS_BLOCK: u64 = 1;

/// An in-memory EVM stand-in that implements [`ChainBackend`].
///
/// Every transaction is mined on submission in a block of its own. A transaction that
/// fails leaves no trace: the ledger is restored and `submit` returns
/// [`ChainError::CallReverted`]. Messages are carried as JSON and dispatched to the mock
/// contract living at the target address.
pub struct SimulatedChain {
    ledger: RefCell<Ledger>,
    receipts: RefCell<HashMap<TxHash, TxReceipt>>,
    accounts: Vec<Address>,
    calls: Cell<u64>,
    mocks: MockContractQuerier,
}

impl Default for SimulatedChain {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedChain {
    pub fn new() -> Self {
        let accounts: Vec<Address> = (0..ACCOUNT_COUNT)
            .map(|i| derive_address(&format!("simulated account {i}")))
            .collect();

        let mut ledger = Ledger {
            block: GENESIS_BLOCK,
            ..Ledger::default()
        };
        for account in &accounts {
            ledger
                .native
                .insert(*account, Uint256::from(INITIAL_NATIVE_BALANCE));
        }

        Self {
            ledger: RefCell::new(ledger),
            receipts: RefCell::new(HashMap::new()),
            accounts,
            calls: Cell::new(0),
            mocks: MockContractQuerier::default(),
        }
    }

    /// Number of [`ChainBackend`] calls made so far. Fixture helpers are not counted.
    pub fn call_count(&self) -> u64 {
        self.calls.get()
    }

    pub fn reset_call_count(&self) {
        self.calls.set(0);
    }

    fn record_call(&self) {
        self.calls.set(self.calls.get() + 1);
    }

    pub fn update_contract_mock(&self, mock: (Address, ContractQueryFunc)) {
        self.mocks.insert_mock(mock);
    }

    pub fn remove_contract_mock(&self, contract: &Address) {
        self.mocks.remove_mock(contract);
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.ledger.borrow().is_contract(address)
    }

    fn fresh_address(&self) -> Address {
        let mut ledger = self.ledger.borrow_mut();
        ledger.nonce += 1;
        derive_address(&format!("simulated fixture {}", ledger.nonce))
    }

    pub fn create_token(&self, decimals: u8) -> Address {
        let address = self.fresh_address();
        self.create_token_at(address, decimals);
        address
    }

    /// Puts a token at a fixed address, as it would exist on a forked network.
    pub fn create_token_at(&self, address: Address, decimals: u8) {
        self.ledger
            .borrow_mut()
            .contracts
            .insert(address, Contract::Token(Erc20State::new(address, decimals)));
    }

    pub fn create_share_vault(&self, underlying: Address) -> Address {
        let address = self.fresh_address();
        self.create_share_vault_at(address, underlying);
        address
    }

    pub fn create_share_vault_at(&self, address: Address, underlying: Address) {
        self.ledger.borrow_mut().contracts.insert(
            address,
            Contract::ShareVault(ShareVaultState::new(address, underlying)),
        );
    }

    pub fn create_staking_rewards(
        &self,
        staking_token: Address,
        rewards_token: Address,
        reward_rate: Uint256,
    ) -> Address {
        let address = self.fresh_address();
        self.create_staking_rewards_at(address, staking_token, rewards_token, reward_rate);
        address
    }

    pub fn create_staking_rewards_at(
        &self,
        address: Address,
        staking_token: Address,
        rewards_token: Address,
        reward_rate: Uint256,
    ) {
        let mut ledger = self.ledger.borrow_mut();
        let state = StakingRewardsState::new(
            address,
            staking_token,
            rewards_token,
            reward_rate,
            ledger.block,
        );
        ledger
            .contracts
            .insert(address, Contract::StakingRewards(state));
    }

    pub fn mint(&self, token: &Address, to: &Address, amount: Uint256) -> ChainResult<()> {
        self.ledger.borrow_mut().token_mut(token)?.mint(to, amount)
    }

    /// Sends freshly minted underlying straight to a share vault, raising the value
    /// of every share.
    pub fn accrue_vault_yield(&self, vault: &Address, amount: Uint256) -> ChainResult<()> {
        let mut ledger = self.ledger.borrow_mut();
        let underlying = ledger.share_vault(vault)?.underlying;
        ledger.token_mut(&underlying)?.mint(vault, amount)
    }

    /// Enters a share vault on behalf of `provider` with freshly minted underlying.
    pub fn provide_vault_liquidity(
        &self,
        vault: &Address,
        provider: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let mut ledger = self.ledger.borrow_mut();
        let underlying = ledger.share_vault(vault)?.underlying;
        let token = ledger.token_mut(&underlying)?;
        token.mint(provider, amount)?;
        token.approve(provider, vault, amount);
        ledger.vault_enter(provider, vault, amount)
    }

    /// Stakes freshly minted staking tokens on behalf of `provider`.
    pub fn provide_stake(
        &self,
        pool: &Address,
        provider: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let mut ledger = self.ledger.borrow_mut();
        let staking_token = ledger.staking_rewards(pool)?.staking_token;
        let token = ledger.token_mut(&staking_token)?;
        token.mint(provider, amount)?;
        token.approve(provider, pool, amount);
        ledger.stake(provider, pool, amount)
    }

    pub fn set_adapter_fault(
        &self,
        adapter: &Address,
        fault: Option<AdapterFault>,
    ) -> ChainResult<()> {
        self.ledger.borrow_mut().adapter_mut(adapter)?.fault = fault;
        Ok(())
    }

    /// Mines `blocks` empty blocks.
    pub fn advance_blocks(&self, blocks: u64) {
        self.ledger.borrow_mut().block += blocks;
    }

    /// Runs `apply` as the body of a new transaction in a new block. On error the
    /// ledger is left exactly as it was.
    fn transact<F>(&self, apply: F) -> ChainResult<TxHash>
    where
        F: FnOnce(&mut Ledger) -> ChainResult<Option<Address>>,
    {
        let mut ledger = self.ledger.borrow_mut();
        let snapshot = ledger.clone();
        ledger.block += 1;
        ledger.nonce += 1;

        match apply(&mut *ledger) {
            Ok(contract_address) => {
                let tx_hash: TxHash =
                    keccak256(format!("simulated tx {} {}", ledger.block, ledger.nonce));
                let receipt = TxReceipt {
                    tx_hash,
                    block_number: ledger.block,
                    success: true,
                    contract_address,
                };
                self.receipts.borrow_mut().insert(tx_hash, receipt);
                Ok(tx_hash)
            }
            Err(err) => {
                *ledger = snapshot;
                tracing::debug!(error = %err, "simulated transaction reverted");
                Err(err)
            }
        }
    }

    fn ensure_account(&self, sender: &Address) -> ChainResult<()> {
        if self.accounts.contains(sender) {
            Ok(())
        } else {
            Err(ChainError::Rpc {
                code: -32000,
                message: format!("unknown account {sender}"),
            })
        }
    }
}

fn derive_address(seed: &str) -> Address {
    Address::from_word(keccak256(seed))
}

fn instantiate(artifact: &ContractArtifact) -> ChainResult<Contract> {
    let name = artifact.contract_name.as_str();
    if name == TEST_DEFI_ADAPTER {
        return Ok(Contract::Router);
    }
    AdapterKind::from_contract_name(name)
        .map(|kind| Contract::Adapter(AdapterState::new(kind)))
        .ok_or_else(|| ChainError::UnknownArtifact {
            name: name.to_string(),
        })
}

impl ChainBackend for SimulatedChain {
    fn accounts(&self) -> ChainResult<Vec<Address>> {
        self.record_call();
        Ok(self.accounts.clone())
    }

    fn block_number(&self) -> ChainResult<u64> {
        self.record_call();
        Ok(self.ledger.borrow().block)
    }

    fn query<M, T>(&self, contract: &Address, msg: &M) -> ChainResult<T>
    where
        M: EvmQuery,
        T: DeserializeOwned,
    {
        self.record_call();
        let msg: Binary = to_json_binary(msg)?;
        let response = match self.mocks.handler(contract, &msg) {
            Some(response) => response?,
            None => self.ledger.borrow().query(contract, &msg)?,
        };
        Ok(from_json(&response)?)
    }

    fn submit<M: EvmCall>(
        &self,
        sender: &Address,
        contract: &Address,
        msg: &M,
    ) -> ChainResult<TxHash> {
        self.record_call();
        self.ensure_account(sender)?;
        let function = msg.signature();
        let msg: Binary = to_json_binary(msg)?;

        let tx_hash = self
            .transact(|ledger| {
                ledger.execute(sender, contract, &msg)?;
                Ok(None)
            })
            .map_err(|err| match err {
                ChainError::CallReverted { .. } => err,
                other => call_reverted(*contract, other.to_string()),
            })?;
        tracing::debug!(%contract, function, %tx_hash, "simulated call");
        Ok(tx_hash)
    }

    fn submit_transfer(
        &self,
        sender: &Address,
        recipient: &Address,
        value: Uint256,
    ) -> ChainResult<TxHash> {
        self.record_call();
        self.ensure_account(sender)?;

        self.transact(|ledger| {
            let balance = ledger.native.get(sender).copied().unwrap_or_default();
            if balance < value {
                return Err(ChainError::Rpc {
                    code: -32000,
                    message: "insufficient funds for transfer".to_string(),
                });
            }
            ledger.native.insert(*sender, balance - value);
            let received = ledger
                .native
                .get(recipient)
                .copied()
                .unwrap_or_default()
                .checked_add(value)?;
            ledger.native.insert(*recipient, received);
            Ok(None)
        })
    }

    fn submit_deployment(
        &self,
        sender: &Address,
        artifact: &ContractArtifact,
        _constructor_args: &[u8],
    ) -> ChainResult<TxHash> {
        self.record_call();
        self.ensure_account(sender)?;
        let contract = instantiate(artifact)?;

        self.transact(|ledger| {
            let address = ledger.next_address(sender);
            ledger.contracts.insert(address, contract);
            tracing::debug!(contract = %artifact.contract_name, %address, "simulated deployment");
            Ok(Some(address))
        })
    }

    fn wait_for_confirmation(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt> {
        self.record_call();
        self.receipts
            .borrow()
            .get(tx_hash)
            .cloned()
            .ok_or_else(|| ChainError::UnknownTransaction {
                tx_hash: tx_hash.to_string(),
            })
    }

    fn seed_balance(
        &self,
        token: &Address,
        holder: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        self.record_call();
        self.ledger
            .borrow_mut()
            .token_mut(token)?
            .set_balance(holder, amount)
    }
}
