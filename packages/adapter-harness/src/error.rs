use chain_client::ChainError;
use cosmwasm_std::{DivideByZeroError, OverflowError};
use thiserror::Error;

use crate::scenario::Checkpoint;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    OverflowError(#[from] OverflowError),

    #[error(transparent)]
    DivideByZeroError(#[from] DivideByZeroError),

    #[error("{checkpoint}: expected {expected}, adapter reported {actual}")]
    Mismatch {
        checkpoint: Checkpoint,
        expected: String,
        actual: String,
    },

    #[error("{checkpoint}: final underlying balance {final_balance} does not exceed {post_deposit} held right after depositing")]
    NoPrincipalReturned {
        checkpoint: Checkpoint,
        post_deposit: String,
        final_balance: String,
    },

    #[error("Adapter reported no underlying token for pool {pool}")]
    NoUnderlyingToken { pool: String },

    #[error("Scenario exceeded its {seconds}s deadline before {checkpoint}")]
    Timeout { checkpoint: Checkpoint, seconds: u64 },

    #[error("Node manages {available} accounts but {required} signers are needed")]
    NotEnoughAccounts { available: usize, required: usize },
}
