//! Versioned, chain-scoped, checksummed addresses.
//!
//! Layout (26 bytes):
//!
//! ```text
//! [version:1][chain tag:1][public key hash:20][checksum:4]
//! ```
//!
//! The key hash is the first 20 bytes of the secure hash of the public key;
//! the checksum is the first 4 bytes of the secure hash of the preceding 22
//! bytes. Any verifier can recompute both locally.

use crate::chain::{ChainId, ChainIdError};
use crate::crypto::PublicKey;
use crate::hash::secure_hash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address version expected by the network.
pub const ADDR_VERSION: u8 = 5;

/// Total address length.
pub const ADDRESS_LENGTH: usize = 26;

/// Length of the public key hash prefix.
pub const KEY_HASH_LENGTH: usize = 20;

/// Length of the trailing checksum.
pub const CHECKSUM_LENGTH: usize = 4;

const BODY_LENGTH: usize = ADDRESS_LENGTH - CHECKSUM_LENGTH;

/// Errors from decoding or validating an address.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid base58 encoding: {0}")]
    Encoding(#[from] bs58::decode::Error),
    #[error("invalid address length: expected 26 bytes, got {0}")]
    InvalidLength(usize),
    #[error("unsupported address version {0}, expected 5")]
    UnsupportedVersion(u8),
    #[error("address checksum mismatch")]
    ChecksumMismatch,
    #[error("address belongs to chain {actual}, expected {expected}")]
    WrongChain { expected: ChainId, actual: ChainId },
    #[error("address has invalid chain tag: {0}")]
    InvalidChainTag(#[from] ChainIdError),
}

fn checksum(body: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&secure_hash(body).0[..CHECKSUM_LENGTH]);
    out
}

/// An address on a V-style chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Derive the address of a public key with the network's address version.
    pub fn from_public_key(public_key: &PublicKey, chain_id: ChainId) -> Self {
        Self::encode(public_key, ADDR_VERSION, chain_id)
    }

    /// Build an address with an explicit version byte.
    pub fn encode(public_key: &PublicKey, version: u8, chain_id: ChainId) -> Self {
        let key_hash = secure_hash(public_key.as_bytes());

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = version;
        bytes[1] = chain_id.tag();
        bytes[2..BODY_LENGTH].copy_from_slice(&key_hash.0[..KEY_HASH_LENGTH]);
        let sum = checksum(&bytes[..BODY_LENGTH]);
        bytes[BODY_LENGTH..].copy_from_slice(&sum);

        tracing::trace!(version, chain = %chain_id, "encoded address");
        Self(bytes)
    }

    /// Parse raw address bytes, checking length, version and checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        let address = Self(arr);

        if address.version() != ADDR_VERSION {
            return Err(AddressError::UnsupportedVersion(address.version()));
        }
        if !address.has_valid_checksum() {
            return Err(AddressError::ChecksumMismatch);
        }
        ChainId::new(arr[1])?;
        Ok(address)
    }

    /// Decode and validate a base-58 address string.
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(s).into_vec()?;
        Self::from_bytes(&bytes).inspect_err(|e| {
            tracing::debug!(address = s, error = %e, "rejected address");
        })
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Base-58 text form for display and node APIs.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    pub fn version(&self) -> u8 {
        self.0[0]
    }

    pub fn chain_id(&self) -> ChainId {
        // checked by `from_bytes`, or copied from a `ChainId` in `encode`
        ChainId::from_checked_tag(self.0[1])
    }

    /// The 20-byte public key hash prefix.
    pub fn key_hash(&self) -> &[u8] {
        &self.0[2..BODY_LENGTH]
    }

    pub fn checksum(&self) -> &[u8] {
        &self.0[BODY_LENGTH..]
    }

    /// Recompute the checksum over the first 22 bytes and compare.
    pub fn has_valid_checksum(&self) -> bool {
        checksum(&self.0[..BODY_LENGTH]) == self.checksum()
    }

    /// Whether this address was derived for `chain_id`.
    pub fn is_on(&self, chain_id: ChainId) -> bool {
        self.chain_id() == chain_id
    }

    /// Like [`Address::is_on`], as an error.
    pub fn ensure_chain(&self, chain_id: ChainId) -> Result<(), AddressError> {
        if self.is_on(chain_id) {
            Ok(())
        } else {
            Err(AddressError::WrongChain {
                expected: chain_id,
                actual: self.chain_id(),
            })
        }
    }

    /// Whether this address belongs to `public_key` on its own chain.
    pub fn matches(&self, public_key: &PublicKey) -> bool {
        Self::encode(public_key, self.version(), self.chain_id()) == *self
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
