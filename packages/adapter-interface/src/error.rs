use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbiError {
    #[error("Malformed return data: {0}")]
    Decode(#[from] alloy::sol_types::Error),

    #[error("{0}")]
    Std(#[from] StdError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum KindError {
    #[error("Unknown adapter kind: {name}")]
    UnknownKind { name: String },
}
