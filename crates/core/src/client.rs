//! Seams to the node API.
//!
//! The identity layer never talks to the network itself. Accounts delegate
//! balance lookups and contract broadcasts to a [`NodeClient`], handing it
//! payloads that request types build from the account's key pair.

use crate::crypto::KeyPair;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// A node API reachable from an [`Account`](crate::Account).
///
/// Errors are the client's own; accounts return them unchanged.
pub trait NodeClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Balance of the base-58 address, in the chain's smallest unit.
    fn get_balance(&self, address: &str) -> Result<u64, Self::Error>;

    /// Broadcast a signed register-contract payload.
    fn broadcast_register(&self, payload: &Value) -> Result<Value, Self::Error>;

    /// Broadcast a signed execute-contract-function payload.
    fn broadcast_execute(&self, payload: &Value) -> Result<Value, Self::Error>;
}

impl<C: NodeClient + ?Sized> NodeClient for &C {
    type Error = C::Error;

    fn get_balance(&self, address: &str) -> Result<u64, Self::Error> {
        (**self).get_balance(address)
    }

    fn broadcast_register(&self, payload: &Value) -> Result<Value, Self::Error> {
        (**self).broadcast_register(payload)
    }

    fn broadcast_execute(&self, payload: &Value) -> Result<Value, Self::Error> {
        (**self).broadcast_execute(payload)
    }
}

impl<C: NodeClient + ?Sized> NodeClient for Arc<C> {
    type Error = C::Error;

    fn get_balance(&self, address: &str) -> Result<u64, Self::Error> {
        (**self).get_balance(address)
    }

    fn broadcast_register(&self, payload: &Value) -> Result<Value, Self::Error> {
        (**self).broadcast_register(payload)
    }

    fn broadcast_execute(&self, payload: &Value) -> Result<Value, Self::Error> {
        (**self).broadcast_execute(payload)
    }
}

/// A register-contract request that can sign itself into a payload.
pub trait RegisterContractRequest {
    fn to_broadcast_register_payload(&self, key_pair: &KeyPair) -> Value;
}

/// An execute-contract-function request that can sign itself into a payload.
pub trait ExecuteContractRequest {
    fn to_broadcast_execute_payload(&self, key_pair: &KeyPair) -> Value;
}

/// Returned by every call on [`Offline`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no node client configured for {operation}")]
pub struct OfflineError {
    pub operation: &'static str,
}

/// A client for chains with no node behind them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offline;

impl NodeClient for Offline {
    type Error = OfflineError;

    fn get_balance(&self, _address: &str) -> Result<u64, Self::Error> {
        Err(OfflineError {
            operation: "get_balance",
        })
    }

    fn broadcast_register(&self, _payload: &Value) -> Result<Value, Self::Error> {
        Err(OfflineError {
            operation: "broadcast_register",
        })
    }

    fn broadcast_execute(&self, _payload: &Value) -> Result<Value, Self::Error> {
        Err(OfflineError {
            operation: "broadcast_execute",
        })
    }
}
