//! Accounts: one seed and nonce bound to a key pair and address on a chain.

use crate::address::Address;
use crate::chain::{Chain, ChainId};
use crate::client::{ExecuteContractRequest, NodeClient, RegisterContractRequest};
use crate::crypto::{CryptoError, KeyPair, Signature};
use crate::hash::{account_seed_hash, Hash, SeedError};
use serde_json::Value;
use std::fmt;

/// A fully derived account.
///
/// Every field is computed in [`Account::new`] and never changes. The account
/// borrows the [`Chain`] it was derived for, which also gives it access to
/// that chain's node client.
pub struct Account<'c, C> {
    chain: &'c Chain<C>,
    seed: String,
    nonce: u64,
    seed_hash: Hash,
    key_pair: KeyPair,
    address: Address,
}

impl<'c, C> Account<'c, C> {
    /// Derive the account for `seed` and `nonce` on `chain`.
    ///
    /// Fails only when the seed has a character outside Latin-1.
    pub fn new(
        chain: &'c Chain<C>,
        seed: impl Into<String>,
        nonce: u64,
    ) -> Result<Self, SeedError> {
        let seed = seed.into();
        let seed_hash = account_seed_hash(&seed, nonce)?;
        let key_pair = KeyPair::from_seed_hash(&seed_hash);
        let address = Address::from_public_key(key_pair.public_key(), chain.id());

        tracing::debug!(nonce, chain = %chain.id(), %address, "derived account");

        Ok(Self {
            chain,
            seed,
            nonce,
            seed_hash,
            key_pair,
            address,
        })
    }

    /// The first account of a seed (nonce 0).
    pub fn from_seed(chain: &'c Chain<C>, seed: impl Into<String>) -> Result<Self, SeedError> {
        Self::new(chain, seed, 0)
    }

    pub fn chain(&self) -> &'c Chain<C> {
        self.chain
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain.id()
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn seed_hash(&self) -> &Hash {
        &self.seed_hash
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The address as base-58 text.
    pub fn address_base58(&self) -> String {
        self.address.to_base58()
    }

    /// Sign a message with this account's private key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.key_pair.sign(message)
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        self.key_pair.verify(message, signature)
    }
}

impl<'c, C: NodeClient> Account<'c, C> {
    /// Ask the node for this account's balance.
    pub fn balance(&self) -> Result<u64, C::Error> {
        tracing::debug!(address = %self.address, "querying balance");
        self.chain.client().get_balance(&self.address_base58())
    }

    /// Sign a register-contract request and broadcast it.
    pub fn register_contract<R>(&self, req: &R) -> Result<Value, C::Error>
    where
        R: RegisterContractRequest + ?Sized,
    {
        let payload = req.to_broadcast_register_payload(&self.key_pair);
        tracing::debug!(address = %self.address, "broadcasting contract registration");
        self.chain.client().broadcast_register(&payload)
    }

    /// Sign an execute-contract-function request and broadcast it.
    pub fn execute_contract<R>(&self, req: &R) -> Result<Value, C::Error>
    where
        R: ExecuteContractRequest + ?Sized,
    {
        let payload = req.to_broadcast_execute_payload(&self.key_pair);
        tracing::debug!(address = %self.address, "broadcasting contract execution");
        self.chain.client().broadcast_execute(&payload)
    }
}

impl<C> Clone for Account<'_, C> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain,
            seed: self.seed.clone(),
            nonce: self.nonce,
            seed_hash: self.seed_hash,
            key_pair: self.key_pair.clone(),
            address: self.address,
        }
    }
}

impl<C> fmt::Debug for Account<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("chain", &self.chain.id())
            .field("nonce", &self.nonce)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
