//! Account delegation to a node client.

use serde_json::{json, Value};
use std::cell::RefCell;
use std::sync::Arc;
use thiserror::Error;
use vsys_core::{
    Account, Chain, ChainId, ExecuteContractRequest, KeyPair, NodeClient, PublicKey,
    RegisterContractRequest, Signature,
};

#[derive(Debug, Error, PartialEq, Eq)]
enum MockError {
    #[error("node rejected request: {0}")]
    Rejected(String),
}

#[derive(Default)]
struct MockNode {
    balance: u64,
    reject: bool,
    balance_queries: RefCell<Vec<String>>,
    broadcasts: RefCell<Vec<(&'static str, Value)>>,
}

impl NodeClient for MockNode {
    type Error = MockError;

    fn get_balance(&self, address: &str) -> Result<u64, Self::Error> {
        self.balance_queries.borrow_mut().push(address.to_string());
        if self.reject {
            return Err(MockError::Rejected("balance".into()));
        }
        Ok(self.balance)
    }

    fn broadcast_register(&self, payload: &Value) -> Result<Value, Self::Error> {
        self.broadcasts
            .borrow_mut()
            .push(("register", payload.clone()));
        if self.reject {
            return Err(MockError::Rejected("register".into()));
        }
        Ok(json!({ "id": "reg-tx" }))
    }

    fn broadcast_execute(&self, payload: &Value) -> Result<Value, Self::Error> {
        self.broadcasts
            .borrow_mut()
            .push(("execute", payload.clone()));
        if self.reject {
            return Err(MockError::Rejected("execute".into()));
        }
        Ok(json!({ "id": "exec-tx" }))
    }
}

struct RegisterRequest {
    contract: &'static str,
}

impl RegisterContractRequest for RegisterRequest {
    fn to_broadcast_register_payload(&self, key_pair: &KeyPair) -> Value {
        let sig = key_pair.sign(self.contract.as_bytes());
        json!({
            "senderPublicKey": key_pair.public_key().to_base58(),
            "contract": self.contract,
            "signature": sig.to_base58(),
        })
    }
}

struct ExecuteRequest {
    func_idx: u16,
}

impl ExecuteContractRequest for ExecuteRequest {
    fn to_broadcast_execute_payload(&self, key_pair: &KeyPair) -> Value {
        let sig = key_pair.sign(&self.func_idx.to_be_bytes());
        json!({
            "senderPublicKey": key_pair.public_key().to_base58(),
            "functionIndex": self.func_idx,
            "signature": sig.to_base58(),
        })
    }
}

fn decode_b58(value: &Value) -> Vec<u8> {
    bs58::decode(value.as_str().unwrap()).into_vec().unwrap()
}

#[test]
fn test_balance_queries_by_address_text() {
    let chain = Chain::testnet(MockNode {
        balance: 1_500,
        ..Default::default()
    });
    let account = Account::new(&chain, "test_seed", 0).unwrap();

    assert_eq!(account.balance().unwrap(), 1_500);
    assert_eq!(
        chain.client().balance_queries.borrow().as_slice(),
        ["AUCoaYAUniWyfBnuPLWWLgXh4tmbhGNo9SW".to_string()]
    );
}

#[test]
fn test_register_contract_signs_with_account_key() {
    let chain = Chain::testnet(MockNode::default());
    let account = Account::from_seed(&chain, "test_seed").unwrap();

    let result = account
        .register_contract(&RegisterRequest { contract: "ctrt" })
        .unwrap();
    assert_eq!(result["id"], "reg-tx");

    let broadcasts = chain.client().broadcasts.borrow();
    let (kind, payload) = &broadcasts[0];
    assert_eq!(*kind, "register");

    let pk = PublicKey::from_slice(&decode_b58(&payload["senderPublicKey"])).unwrap();
    assert_eq!(&pk, account.key_pair().public_key());
    assert!(account.address().matches(&pk));

    let sig = Signature::from_slice(&decode_b58(&payload["signature"])).unwrap();
    assert!(pk.verify(b"ctrt", &sig).is_ok());
}

#[test]
fn test_execute_contract_delegates() {
    let chain = Chain::testnet(MockNode::default());
    let account = Account::new(&chain, "test_seed", 5).unwrap();

    let result = account
        .execute_contract(&ExecuteRequest { func_idx: 3 })
        .unwrap();
    assert_eq!(result["id"], "exec-tx");

    let broadcasts = chain.client().broadcasts.borrow();
    assert_eq!(broadcasts.len(), 1);
    assert_eq!(broadcasts[0].0, "execute");
    assert_eq!(broadcasts[0].1["functionIndex"], 3);
}

#[test]
fn test_client_errors_propagate_unchanged() {
    let chain = Chain::testnet(MockNode {
        reject: true,
        ..Default::default()
    });
    let account = Account::from_seed(&chain, "test_seed").unwrap();

    assert_eq!(
        account.balance(),
        Err(MockError::Rejected("balance".into()))
    );
    assert_eq!(
        account.register_contract(&RegisterRequest { contract: "c" }),
        Err(MockError::Rejected("register".into()))
    );
    assert_eq!(
        account.execute_contract(&ExecuteRequest { func_idx: 0 }),
        Err(MockError::Rejected("execute".into()))
    );
}

#[test]
fn test_shared_client_across_chains() {
    let node = Arc::new(MockNode {
        balance: 7,
        ..Default::default()
    });
    let mainnet = Chain::new(ChainId::MAINNET, Arc::clone(&node));
    let testnet = Chain::new(ChainId::TESTNET, Arc::clone(&node));

    let m = Account::from_seed(&mainnet, "test_seed").unwrap();
    let t = Account::from_seed(&testnet, "test_seed").unwrap();
    assert_eq!(m.key_pair(), t.key_pair());
    assert_ne!(m.address(), t.address());

    assert_eq!(m.balance().unwrap(), 7);
    assert_eq!(t.balance().unwrap(), 7);
    assert_eq!(node.balance_queries.borrow().len(), 2);
}

#[test]
fn test_derivation_is_thread_safe() {
    let handles: Vec<_> = (0..4u64)
        .map(|nonce| {
            std::thread::spawn(move || {
                let chain = Chain::offline(ChainId::TESTNET);
                Account::new(&chain, "test_seed", nonce).unwrap().address_base58()
            })
        })
        .collect();
    let addresses: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(addresses[0], "AUCoaYAUniWyfBnuPLWWLgXh4tmbhGNo9SW");
    assert_eq!(addresses[1], "AU4NZdxCN3uboyNAwKyotypjyNp8fM9XdtB");
}
