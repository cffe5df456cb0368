use std::{cell::RefCell, collections::HashMap, rc::Rc};

use alloy::primitives::Address;
use cosmwasm_std::{from_json, Binary, StdResult};
use serde::de::DeserializeOwned;

/// Answers a view call in place of the contract. `None` lets the call through to
/// the contract itself.
pub type ContractQueryFunc = Box<dyn Fn(&Binary) -> Option<StdResult<Binary>>>;

#[derive(Clone, Default)]
pub struct MockContractQuerier {
    contract_mocks: Rc<RefCell<HashMap<Address, ContractQueryFunc>>>,
}

impl MockContractQuerier {
    pub fn new(contract_mocks: HashMap<Address, ContractQueryFunc>) -> Self {
        Self {
            contract_mocks: Rc::new(RefCell::new(contract_mocks)),
        }
    }

    pub fn insert_mock(&self, mock: (Address, ContractQueryFunc)) {
        self.contract_mocks.borrow_mut().insert(mock.0, mock.1);
    }

    pub fn remove_mock(&self, contract: &Address) {
        self.contract_mocks.borrow_mut().remove(contract);
    }

    pub fn handler(&self, contract: &Address, msg: &Binary) -> Option<StdResult<Binary>> {
        let contract_mocks = self.contract_mocks.borrow();
        let handler = contract_mocks.get(contract)?;

        (handler)(msg)
    }
}

/// Builds a mock for `contract` that handles the messages deserializing as `Q`.
/// Everything else, and every message for which `query_handler` returns `None`,
/// reaches the real contract.
pub fn setup_contract_query_mock<Q, T>(
    contract: Address,
    query_handler: T,
) -> (Address, ContractQueryFunc)
where
    Q: DeserializeOwned,
    T: Fn(&Q) -> Option<StdResult<Binary>> + 'static,
{
    let response = Box::new(move |msg: &Binary| match from_json::<Q>(msg) {
        Ok(query) => query_handler(&query),
        Err(_) => None,
    });

    (contract, response)
}
