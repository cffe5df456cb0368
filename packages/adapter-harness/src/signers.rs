use alloy::primitives::Address;
use chain_client::ChainBackend;

use crate::error::HarnessError;

/// Named roles taken from the node's accounts, in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signers {
    /// Mines blocks
    pub admin: Address,
    pub owner: Address,
    /// Deploys the adapter and the router and drives the router
    pub deployer: Address,
    pub alice: Address,
}

impl Signers {
    pub const ROLES: usize = 4;

    pub fn from_accounts(accounts: &[Address]) -> Result<Self, HarnessError> {
        match accounts {
            [admin, owner, deployer, alice, ..] => Ok(Self {
                admin: *admin,
                owner: *owner,
                deployer: *deployer,
                alice: *alice,
            }),
            _ => Err(HarnessError::NotEnoughAccounts {
                available: accounts.len(),
                required: Self::ROLES,
            }),
        }
    }

    pub fn load<B: ChainBackend>(chain: &B) -> Result<Self, HarnessError> {
        Self::from_accounts(&chain.accounts()?)
    }
}
