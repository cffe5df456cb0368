use std::borrow::Cow;
use std::future::IntoFuture;
use std::thread;
use std::time::Instant;

use adapter_interface::{to_u256, Erc20QueryMsg, EvmCall, EvmQuery};
use alloy::network::TransactionBuilder;
use alloy::primitives::{keccak256, Address, Bytes, B256, U256, U64};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolValue;
use alloy::transports::http::{Client, Http};
use alloy::transports::TransportResult;
use cosmwasm_std::{from_json, Uint256};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::runtime::{Builder, Runtime};

use crate::artifact::ContractArtifact;
use crate::backend::{ChainBackend, TxHash, TxReceipt};
use crate::error::{ChainError, ChainResult};
use crate::network::{NetworkConfig, ENV_RPC_URL};

/// Number of storage slots searched for a token's `balanceOf` mapping.
pub const BALANCE_SLOT_SEARCH_DEPTH: u64 = 100;

/// The receipt fields read back from `eth_getTransactionReceipt`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcReceipt {
    pub transaction_hash: B256,
    pub block_number: U64,
    pub status: Option<U64>,
    pub contract_address: Option<Address>,
}

impl From<RpcReceipt> for TxReceipt {
    fn from(receipt: RpcReceipt) -> Self {
        TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.to::<u64>(),
            // receipts from before EIP-658 carry no status
            success: receipt.status.map_or(true, |status| status == U64::from(1u8)),
            contract_address: receipt.contract_address,
        }
    }
}

/// Storage keys a `balanceOf` mapping at `slot` may use: Solidity hashes
/// `(key, slot)`, Vyper hashes `(slot, key)`.
pub(crate) fn balance_slot_candidates(holder: &Address, slot: u64) -> [U256; 2] {
    let slot = U256::from(slot);
    [
        U256::from_be_bytes(keccak256((*holder, slot).abi_encode()).0),
        U256::from_be_bytes(keccak256((slot, *holder).abi_encode()).0),
    ]
}

/// `ChainBackend` over the JSON-RPC interface of a live or forked EVM node.
///
/// Transactions are signed by the node (`eth_sendTransaction`), so senders must be
/// accounts the node manages, as on hardhat and anvil development nodes. Requests
/// run on a private current-thread runtime, so this type must not be driven from
/// inside another tokio runtime.
pub struct JsonRpcChain {
    provider: RootProvider<Http<Client>>,
    runtime: Runtime,
    config: NetworkConfig,
}

impl JsonRpcChain {
    pub fn new(config: NetworkConfig) -> ChainResult<Self> {
        let url = config
            .rpc_url
            .parse()
            .map_err(|_| ChainError::InvalidConfig {
                key: ENV_RPC_URL.to_string(),
                value: config.rpc_url.clone(),
            })?;
        let runtime = Builder::new_current_thread().enable_all().build()?;

        Ok(Self {
            provider: ProviderBuilder::new().on_http(url),
            runtime,
            config,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Drives one request to completion, bounded by the configured request timeout.
    fn block_on<F, T>(&self, method: &'static str, request: F) -> ChainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        let timeout = self.config.request_timeout;
        let response = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, request).await })
            .map_err(|_| ChainError::RequestTimeout {
                method,
                millis: timeout.as_millis(),
            })?;

        response.map_err(|err| {
            let err = ChainError::from(err);
            tracing::debug!(method, error = %err, "rpc request failed");
            err
        })
    }

    fn send_transaction(&self, tx: TransactionRequest) -> ChainResult<TxHash> {
        let pending = self.block_on("eth_sendTransaction", self.provider.send_transaction(tx))?;
        Ok(*pending.tx_hash())
    }

    fn storage_at(&self, contract: &Address, slot: U256) -> ChainResult<U256> {
        self.block_on(
            "eth_getStorageAt",
            self.provider.get_storage_at(*contract, slot),
        )
    }

    fn set_storage_at(&self, contract: &Address, slot: U256, value: U256) -> ChainResult<()> {
        let method = self.config.node.storage_write_method();
        let word = B256::from(value.to_be_bytes::<32>());
        let _: Value = self.block_on(
            method,
            self.provider
                .raw_request::<_, Value>(Cow::Borrowed(method), json!([contract, slot, word])),
        )?;
        Ok(())
    }

    fn token_balance(&self, token: &Address, holder: &Address) -> ChainResult<U256> {
        let balance: Uint256 = self.query(token, &Erc20QueryMsg::BalanceOf { account: *holder })?;
        Ok(to_u256(balance))
    }
}

impl ChainBackend for JsonRpcChain {
    fn accounts(&self) -> ChainResult<Vec<Address>> {
        self.block_on("eth_accounts", self.provider.get_accounts())
    }

    fn block_number(&self) -> ChainResult<u64> {
        self.block_on("eth_blockNumber", self.provider.get_block_number())
    }

    fn query<M, T>(&self, contract: &Address, msg: &M) -> ChainResult<T>
    where
        M: EvmQuery,
        T: DeserializeOwned,
    {
        let tx = TransactionRequest::default()
            .with_to(*contract)
            .with_input(msg.calldata());
        let data: Bytes = self.block_on("eth_call", self.provider.call(&tx))?;
        Ok(from_json(msg.decode_returns(&data)?)?)
    }

    fn submit<M: EvmCall>(
        &self,
        sender: &Address,
        contract: &Address,
        msg: &M,
    ) -> ChainResult<TxHash> {
        let tx_hash = self.send_transaction(
            TransactionRequest::default()
                .with_from(*sender)
                .with_to(*contract)
                .with_input(msg.calldata()),
        )?;
        tracing::debug!(%contract, function = msg.signature(), %tx_hash, "submitted call");
        Ok(tx_hash)
    }

    fn submit_transfer(
        &self,
        sender: &Address,
        recipient: &Address,
        value: Uint256,
    ) -> ChainResult<TxHash> {
        self.send_transaction(
            TransactionRequest::default()
                .with_from(*sender)
                .with_to(*recipient)
                .with_value(to_u256(value)),
        )
    }

    fn submit_deployment(
        &self,
        sender: &Address,
        artifact: &ContractArtifact,
        constructor_args: &[u8],
    ) -> ChainResult<TxHash> {
        if artifact.bytecode.is_empty() {
            return Err(ChainError::UnknownArtifact {
                name: artifact.contract_name.clone(),
            });
        }
        let tx_hash = self.send_transaction(
            TransactionRequest::default()
                .with_from(*sender)
                .with_deploy_code(artifact.creation_code(constructor_args)),
        )?;
        tracing::debug!(contract = %artifact.contract_name, %tx_hash, "submitted deployment");
        Ok(tx_hash)
    }

    fn wait_for_confirmation(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt> {
        let started = Instant::now();
        loop {
            let receipt: Option<RpcReceipt> = self.block_on(
                "eth_getTransactionReceipt",
                self.provider.raw_request::<_, Option<RpcReceipt>>(
                    Cow::Borrowed("eth_getTransactionReceipt"),
                    json!([tx_hash]),
                ),
            )?;
            if let Some(receipt) = receipt {
                return Ok(receipt.into());
            }

            if started.elapsed() >= self.config.confirmation_timeout {
                return Err(ChainError::ConfirmationTimeout {
                    tx_hash: tx_hash.to_string(),
                    millis: self.config.confirmation_timeout.as_millis(),
                });
            }
            thread::sleep(self.config.poll_interval);
        }
    }

    fn seed_balance(
        &self,
        token: &Address,
        holder: &Address,
        amount: Uint256,
    ) -> ChainResult<()> {
        let amount = to_u256(amount);
        // A write only counts as a hit if it moves `balanceOf` to a value it did not
        // already have.
        let current = self.token_balance(token, holder)?;
        let marker = if current == amount {
            amount ^ U256::from(1u8)
        } else {
            amount
        };

        for slot in 0..BALANCE_SLOT_SEARCH_DEPTH {
            for key in balance_slot_candidates(holder, slot) {
                let previous = self.storage_at(token, key)?;
                self.set_storage_at(token, key, marker)?;

                if self.token_balance(token, holder)? == marker {
                    if marker != amount {
                        self.set_storage_at(token, key, amount)?;
                    }
                    tracing::debug!(%token, %holder, slot, "seeded balance");
                    return Ok(());
                }

                self.set_storage_at(token, key, previous)?;
            }
        }

        Err(ChainError::BalanceSlotNotFound { token: *token })
    }
}
