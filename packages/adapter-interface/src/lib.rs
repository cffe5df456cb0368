pub mod abi;
pub mod error;
pub mod kind;
pub mod msg;
pub mod pool;
pub mod token;


// Re-export the main types for convenience
pub use abi::{from_u256, to_u256, EvmCall, EvmQuery};
pub use error::{AbiError, KindError};
pub use kind::{AdapterKind, TEST_DEFI_ADAPTER};
pub use msg::{AdapterQueryMsg, RouterExecuteMsg, RouterQueryMsg};
pub use pool::{
    ShareVaultExecuteMsg, ShareVaultQueryMsg, StakingRewardsExecuteMsg, StakingRewardsQueryMsg,
};
pub use token::{Erc20ExecuteMsg, Erc20QueryMsg};
