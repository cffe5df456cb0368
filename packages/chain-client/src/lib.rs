pub mod artifact;
pub mod backend;
pub mod error;
pub mod network;
pub mod rpc;

#[cfg(test)]
mod testing_rpc;

pub use artifact::{ArtifactStore, ContractArtifact};
pub use backend::{ChainBackend, TxHash, TxReceipt};
pub use error::{ChainError, ChainResult};
pub use network::{NetworkConfig, NodeKind};
pub use rpc::JsonRpcChain;
