//! Deterministic account identities for V-style chains.
//!
//! Given a seed phrase and a nonce, this crate derives:
//! - the 32-byte account seed hash (BLAKE2b-256 → Keccak-256 → SHA-256)
//! - a Curve25519 key pair (clamped seed hash, X25519 base-point multiply)
//! - a 26-byte versioned, chain-scoped, checksummed address
//!
//! Network access is left to a [`NodeClient`] supplied by the caller; the
//! derivation itself is pure and can run on any thread.
//!
//! # Example
//!
//! ```rust
//! use vsys_core::{Account, Chain, ChainId};
//!
//! let chain = Chain::offline(ChainId::TESTNET);
//! let account = Account::new(&chain, "test_seed", 0)?;
//! assert_eq!(account.address_base58(), "AUCoaYAUniWyfBnuPLWWLgXh4tmbhGNo9SW");
//! # Ok::<(), vsys_core::SeedError>(())
//! ```
//!
//! Seeds are hashed as Latin-1, so a seed containing a character above
//! U+00FF is rejected with [`SeedError`].

pub mod account;
pub mod address;
pub mod chain;
pub mod client;
pub mod crypto;
pub mod hash;

// Re-export commonly used types at the crate root
pub use account::Account;
pub use address::{Address, AddressError, ADDR_VERSION};
pub use chain::{Chain, ChainId, ChainIdError};
pub use client::{
    ExecuteContractRequest, NodeClient, Offline, OfflineError, RegisterContractRequest,
};
pub use crypto::{CryptoError, KeyPair, PrivateKey, PublicKey, Signature};
pub use hash::{account_seed_hash, secure_hash, seed_bytes, Hash, HashChain, SeedError, H256};
