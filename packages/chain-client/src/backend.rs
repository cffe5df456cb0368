use adapter_interface::{EvmCall, EvmQuery};
use alloy::primitives::{Address, B256};
use cosmwasm_std::Uint256;
use serde::de::DeserializeOwned;

use crate::artifact::ContractArtifact;
use crate::error::{ChainError, ChainResult};

/// Hash of a submitted transaction.
pub type TxHash = B256;

/// Outcome of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub success: bool,
    /// Set for contract-creation transactions
    pub contract_address: Option<Address>,
}

impl TxReceipt {
    pub fn ensure_success(self) -> ChainResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ChainError::Reverted {
                tx_hash: self.tx_hash.to_string(),
            })
        }
    }
}

/// The capabilities the harness and the deployer need from a chain.
///
/// Every call is a blocking request/response; nothing here retries. Transactions
/// are only final once `wait_for_confirmation` returned their receipt.
pub trait ChainBackend {
    /// Accounts the node signs for, in the order roles are assigned from.
    fn accounts(&self) -> ChainResult<Vec<Address>>;

    fn block_number(&self) -> ChainResult<u64>;

    /// Read-only view call against the latest block.
    fn query<M, T>(&self, contract: &Address, msg: &M) -> ChainResult<T>
    where
        M: EvmQuery,
        T: DeserializeOwned;

    /// Submits a state-changing call and returns without waiting for it to be mined.
    fn submit<M: EvmCall>(
        &self,
        sender: &Address,
        contract: &Address,
        msg: &M,
    ) -> ChainResult<TxHash>;

    /// Submits a plain value transfer.
    fn submit_transfer(
        &self,
        sender: &Address,
        recipient: &Address,
        value: Uint256,
    ) -> ChainResult<TxHash>;

    /// Submits a contract-creation transaction. `constructor_args` is the
    /// ABI-encoded argument tuple appended to the creation code.
    fn submit_deployment(
        &self,
        sender: &Address,
        artifact: &ContractArtifact,
        constructor_args: &[u8],
    ) -> ChainResult<TxHash>;

    /// Blocks until the transaction is mined and returns its receipt.
    fn wait_for_confirmation(&self, tx_hash: &TxHash) -> ChainResult<TxReceipt>;

    /// Test fixture capability: make `holder` own exactly `amount` of `token`
    /// without a transfer from anyone.
    fn seed_balance(
        &self,
        token: &Address,
        holder: &Address,
        amount: Uint256,
    ) -> ChainResult<()>;

    /// Submits a call and waits for it; a reverted transaction is an error.
    fn execute<M: EvmCall>(
        &self,
        sender: &Address,
        contract: &Address,
        msg: &M,
    ) -> ChainResult<TxReceipt> {
        let tx_hash = self.submit(sender, contract, msg)?;
        let receipt = self.wait_for_confirmation(&tx_hash)?.ensure_success()?;
        tracing::debug!(
            %contract,
            function = msg.signature(),
            block = receipt.block_number,
            "transaction confirmed"
        );
        Ok(receipt)
    }

    /// Deploys a contract and returns its address once the creation is mined.
    fn deploy(
        &self,
        sender: &Address,
        artifact: &ContractArtifact,
        constructor_args: &[u8],
    ) -> ChainResult<Address> {
        let tx_hash = self.submit_deployment(sender, artifact, constructor_args)?;
        let receipt = self.wait_for_confirmation(&tx_hash)?.ensure_success()?;
        receipt
            .contract_address
            .ok_or_else(|| ChainError::MissingContractAddress {
                tx_hash: tx_hash.to_string(),
            })
    }

    /// Produces a new block with a zero-value self-transfer.
    fn mine_block(&self, signer: &Address) -> ChainResult<TxReceipt> {
        let tx_hash = self.submit_transfer(signer, signer, Uint256::zero())?;
        self.wait_for_confirmation(&tx_hash)?.ensure_success()
    }
}
