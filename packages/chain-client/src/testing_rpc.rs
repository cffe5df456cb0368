// JsonRpcChain against an in-process mock node

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use adapter_interface::Erc20QueryMsg;
use alloy::primitives::{address, Address, B256, U256};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use cosmwasm_std::Uint256;
use serde_json::{json, Value};

use crate::backend::{ChainBackend, TxHash};
use crate::error::ChainError;
use crate::network::{NetworkConfig, NodeKind, ETHEREUM_FORK};
use crate::rpc::{balance_slot_candidates, JsonRpcChain, BALANCE_SLOT_SEARCH_DEPTH};

const TOKEN: Address = address!("6B3595068778DD592e39A122f4f5a5cF09C90fE2");
const HOLDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
const BALANCE_OF_SELECTOR: &str = "0x70a08231";

type Shared = Arc<Mutex<MockNode>>;

/// A single-token node: `balanceOf` reads one storage word of the token, every
/// other call reverts.
struct MockNode {
    storage: HashMap<U256, U256>,
    /// Storage key `balanceOf(HOLDER)` reads, if the token keeps balances at all
    balance_key: Option<U256>,
    storage_write_method: &'static str,
    /// Receipt lookups answered with `null` before the transaction is mined
    pending_polls: usize,
    never_mined: bool,
    writes: Vec<(U256, U256)>,
    methods: Vec<String>,
}

impl MockNode {
    fn new(balance_key: Option<U256>) -> Self {
        Self {
            storage: HashMap::new(),
            balance_key,
            storage_write_method: "hardhat_setStorageAt",
            pending_polls: 0,
            never_mined: false,
            writes: vec![],
            methods: vec![],
        }
    }

    fn read(&self, key: U256) -> U256 {
        self.storage.get(&key).copied().unwrap_or_default()
    }

    fn calls_of(&self, method: &str) -> usize {
        self.methods.iter().filter(|m| *m == method).count()
    }

    fn answer(&mut self, method: &str, params: &Value) -> Result<Value, (i64, String)> {
        self.methods.push(method.to_string());
        match method {
            "eth_accounts" => Ok(json!([HOLDER])),
            "eth_blockNumber" => Ok(json!("0x1b4")),
            "eth_sendTransaction" => Ok(json!(TX_HASH)),
            "eth_call" => {
                let input = params[0]["input"]
                    .as_str()
                    .or_else(|| params[0]["data"].as_str())
                    .unwrap_or_default();
                if !input.starts_with(BALANCE_OF_SELECTOR) {
                    return Err((-32000, "execution reverted".to_string()));
                }
                let balance = self.balance_key.map(|key| self.read(key)).unwrap_or_default();
                Ok(json!(word(balance)))
            }
            "eth_getStorageAt" => Ok(json!(word(self.read(quantity(&params[1]))))),
            "eth_getTransactionReceipt" => {
                if self.never_mined || self.pending_polls > 0 {
                    self.pending_polls = self.pending_polls.saturating_sub(1);
                    return Ok(Value::Null);
                }
                Ok(json!({
                    "transactionHash": params[0],
                    "blockNumber": "0x1b5",
                    "status": "0x1",
                    "contractAddress": null,
                    "gasUsed": "0x5208"
                }))
            }
            write if write == self.storage_write_method => {
                let key = quantity(&params[1]);
                let value = quantity(&params[2]);
                self.writes.push((key, value));
                self.storage.insert(key, value);
                Ok(json!(true))
            }
            other => Err((
                -32601,
                format!("the method {other} does not exist/is not available"),
            )),
        }
    }
}

fn word(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

fn quantity(value: &Value) -> U256 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

async fn handle(State(node): State<Shared>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let outcome = node.lock().unwrap().answer(&method, &request["params"]);

    Json(match outcome {
        Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": code, "message": message}
        }),
    })
}

/// Serves `node` on an ephemeral local port and returns its URL.
fn serve(node: Shared) -> String {
    let (tx, rx) = mpsc::channel::<SocketAddr>();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            let router = Router::new().route("/", post(handle)).with_state(node);
            axum::serve(listener, router).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn connect(node: MockNode, kind: NodeKind) -> (JsonRpcChain, Shared) {
    let node = Arc::new(Mutex::new(node));
    let mut config = NetworkConfig::from(&ETHEREUM_FORK).with_rpc_url(serve(node.clone()));
    config.node = kind;
    config.poll_interval = Duration::from_millis(5);
    config.confirmation_timeout = Duration::from_millis(200);
    config.request_timeout = Duration::from_secs(5);
    (JsonRpcChain::new(config).unwrap(), node)
}

#[test]
fn accounts_and_block_number() {
    let (chain, _) = connect(MockNode::new(None), NodeKind::Hardhat);
    assert_eq!(chain.accounts().unwrap(), vec![HOLDER]);
    assert_eq!(chain.block_number().unwrap(), 436);
}

#[test]
fn seeds_balance_in_solidity_layout() {
    let [balance_key, _] = balance_slot_candidates(&HOLDER, 3);
    let [unrelated, _] = balance_slot_candidates(&HOLDER, 1);
    let mut node = MockNode::new(Some(balance_key));
    node.storage.insert(unrelated, U256::from(77u8));
    let (chain, node) = connect(node, NodeKind::Hardhat);

    let amount = Uint256::from(1_000_000u128);
    chain.seed_balance(&TOKEN, &HOLDER, amount).unwrap();

    let balance: Uint256 = chain
        .query(&TOKEN, &Erc20QueryMsg::BalanceOf { account: HOLDER })
        .unwrap();
    assert_eq!(balance, amount);

    let node = node.lock().unwrap();
    assert_eq!(node.read(balance_key), U256::from(1_000_000u64));
    // words overwritten on the way are put back
    assert_eq!(node.read(unrelated), U256::from(77u8));
    for slot in 0..3 {
        for key in balance_slot_candidates(&HOLDER, slot) {
            if key != unrelated {
                assert_eq!(node.read(key), U256::ZERO);
            }
        }
    }
}

#[test]
fn seeds_balance_in_vyper_layout() {
    let [solidity_key, vyper_key] = balance_slot_candidates(&HOLDER, 2);
    let (chain, node) = connect(MockNode::new(Some(vyper_key)), NodeKind::Hardhat);

    chain
        .seed_balance(&TOKEN, &HOLDER, Uint256::from(42u128))
        .unwrap();

    let node = node.lock().unwrap();
    assert_eq!(node.read(vyper_key), U256::from(42u8));
    assert_eq!(node.read(solidity_key), U256::ZERO);
    assert_eq!(node.writes.last(), Some(&(vyper_key, U256::from(42u8))));
}

#[test]
fn seeding_the_current_balance_still_finds_the_real_slot() {
    let [balance_key, _] = balance_slot_candidates(&HOLDER, 4);
    let [first_key, _] = balance_slot_candidates(&HOLDER, 0);
    let amount = U256::from(500u64);
    let mut node = MockNode::new(Some(balance_key));
    node.storage.insert(balance_key, amount);
    let (chain, node) = connect(node, NodeKind::Hardhat);

    chain
        .seed_balance(&TOKEN, &HOLDER, Uint256::from(500u128))
        .unwrap();

    let node = node.lock().unwrap();
    // the first key tried must not be mistaken for the balance slot
    assert_eq!(node.read(first_key), U256::ZERO);
    assert!(node.writes.iter().any(|(key, _)| *key == first_key));
    assert_eq!(node.read(balance_key), amount);
    assert_eq!(node.writes.last(), Some(&(balance_key, amount)));
}

#[test]
fn missing_balance_mapping_is_reported() {
    let mut node = MockNode::new(None);
    let [preset, _] = balance_slot_candidates(&HOLDER, 7);
    node.storage.insert(preset, U256::from(9u8));
    let (chain, node) = connect(node, NodeKind::Hardhat);

    let err = chain
        .seed_balance(&TOKEN, &HOLDER, Uint256::from(1u128))
        .unwrap_err();
    assert!(matches!(err, ChainError::BalanceSlotNotFound { token } if token == TOKEN));

    let node = node.lock().unwrap();
    // every candidate is written once and restored once
    assert_eq!(node.writes.len() as u64, 2 * 2 * BALANCE_SLOT_SEARCH_DEPTH);
    assert_eq!(node.read(preset), U256::from(9u8));
    assert!(node
        .storage
        .iter()
        .all(|(key, value)| *key == preset || value.is_zero()));
}

#[test]
fn anvil_nodes_use_their_storage_method() {
    let [balance_key, _] = balance_slot_candidates(&HOLDER, 0);
    let mut node = MockNode::new(Some(balance_key));
    node.storage_write_method = "anvil_setStorageAt";
    let (chain, node) = connect(node, NodeKind::Anvil);

    chain
        .seed_balance(&TOKEN, &HOLDER, Uint256::from(3u128))
        .unwrap();
    assert_eq!(node.lock().unwrap().calls_of("hardhat_setStorageAt"), 0);

    // a hardhat-configured client against the same node gets the node's error back
    let (chain, _) = connect(
        {
            let mut node = MockNode::new(Some(balance_key));
            node.storage_write_method = "anvil_setStorageAt";
            node
        },
        NodeKind::Hardhat,
    );
    let err = chain
        .seed_balance(&TOKEN, &HOLDER, Uint256::from(3u128))
        .unwrap_err();
    assert!(matches!(err, ChainError::Rpc { code: -32601, .. }), "{err}");
}

#[test]
fn waits_for_pending_receipt() {
    let mut node = MockNode::new(None);
    node.pending_polls = 3;
    let (chain, node) = connect(node, NodeKind::Hardhat);

    let tx_hash: TxHash = TX_HASH.parse().unwrap();
    let receipt = chain.wait_for_confirmation(&tx_hash).unwrap();
    assert_eq!(receipt.tx_hash, tx_hash);
    assert_eq!(receipt.block_number, 437);
    assert!(receipt.success);

    assert_eq!(
        node.lock().unwrap().calls_of("eth_getTransactionReceipt"),
        4
    );
}

#[test]
fn confirmation_times_out() {
    let mut node = MockNode::new(None);
    node.never_mined = true;
    let (chain, node) = connect(node, NodeKind::Hardhat);

    let tx_hash: TxHash = TX_HASH.parse().unwrap();
    let err = chain.wait_for_confirmation(&tx_hash).unwrap_err();
    assert!(
        matches!(err, ChainError::ConfirmationTimeout { ref tx_hash, millis: 200 } if tx_hash == TX_HASH),
        "{err}"
    );
    assert!(node.lock().unwrap().calls_of("eth_getTransactionReceipt") > 1);
}

#[test]
fn rpc_error_objects_map_to_rpc_errors() {
    let (chain, _) = connect(MockNode::new(None), NodeKind::Hardhat);

    let err = chain
        .query::<_, Uint256>(&TOKEN, &Erc20QueryMsg::TotalSupply {})
        .unwrap_err();
    match err {
        ChainError::Rpc { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "execution reverted");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn submitted_transaction_hash_is_returned() {
    let (chain, node) = connect(MockNode::new(None), NodeKind::Hardhat);

    let tx_hash = chain
        .submit_transfer(&HOLDER, &HOLDER, Uint256::zero())
        .unwrap();
    assert_eq!(tx_hash.to_string(), TX_HASH);
    assert_eq!(node.lock().unwrap().calls_of("eth_sendTransaction"), 1);
}
