use adapter_interface::AbiError;
use alloy::primitives::Address;
use alloy::transports::{RpcError, TransportError};
use cosmwasm_std::{DivideByZeroError, OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    OverflowError(#[from] OverflowError),

    #[error(transparent)]
    DivideByZeroError(#[from] DivideByZeroError),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("Failed to start the request runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(TransportError),

    #[error("{method} got no response within {millis}ms")]
    RequestTimeout { method: &'static str, millis: u128 },

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Failed to parse node response: {0}")]
    Parse(String),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("Call to {contract} reverted: {reason}")]
    CallReverted {
        contract: Address,
        reason: String,
    },

    #[error("No receipt for transaction {tx_hash} after {millis}ms")]
    ConfirmationTimeout { tx_hash: String, millis: u128 },

    #[error("Deployment transaction {tx_hash} produced no contract address")]
    MissingContractAddress { tx_hash: String },

    #[error("No contract deployed at {address}")]
    NoContract { address: Address },

    #[error("Node manages no accounts")]
    NoAccounts,

    #[error("Unknown transaction {tx_hash}")]
    UnknownTransaction { tx_hash: String },

    #[error("No contract can be created from artifact {name}")]
    UnknownArtifact { name: String },

    #[error("Artifact {name} not found under {dir}")]
    ArtifactNotFound { name: String, dir: String },

    #[error("Failed to read artifact {path}: {reason}")]
    ArtifactRead { path: String, reason: String },

    #[error("Could not locate the balanceOf storage slot of token {token}")]
    BalanceSlotNotFound { token: Address },

    #[error("Invalid value for {key}: {value}")]
    InvalidConfig { key: String, value: String },
}

impl From<TransportError> for ChainError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => ChainError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            other => ChainError::Transport(other),
        }
    }
}

pub type ChainResult<T> = Result<T, ChainError>;

pub fn call_reverted(contract: Address, reason: impl Into<String>) -> ChainError {
    ChainError::CallReverted {
        contract,
        reason: reason.into(),
    }
}
