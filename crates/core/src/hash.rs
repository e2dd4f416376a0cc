//! Hash primitives and the composite hash chain used for account identities.
//!
//! Two composite hashes are built from the same core:
//!
//! ```text
//! secure hash:        keccak256(blake2b256(data))
//! account seed hash:  sha256(keccak256(blake2b256(nonce || seed)))
//! ```
//!
//! Both are expressed through [`HashChain`] so the BLAKE2b → Keccak
//! composition exists in exactly one place.

use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use std::fmt;
use thiserror::Error;

/// A named alias for a 32-byte(u8) array, used to represent a 256-bit hash.
pub type H256 = [u8; 32];

type Blake2b256 = Blake2b<U32>;

/// A wrapper type for H256 with Display and Debug formatting.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash(pub H256);

impl Hash {
    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &H256 {
        &self.0
    }

    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash(0x{})", &self.to_hex()[..8])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// BLAKE2b with a 32-byte digest.
pub fn blake2b256(data: &[u8]) -> Hash {
    Hash(Blake2b256::digest(data).into())
}

/// Keccak-256 (original Keccak padding, not FIPS SHA3-256).
pub fn keccak256(data: &[u8]) -> Hash {
    Hash(Keccak256::digest(data).into())
}

/// SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Hash(Sha256::digest(data).into())
}

/// The BLAKE2b-256 → Keccak-256 composition, optionally sealed with SHA-256.
///
/// [`HashChain::SECURE`] is used for public-key hashes and address
/// checksums. [`HashChain::ACCOUNT_SEED`] appends the SHA-256 stage and
/// produces the 32-byte seed that keys are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashChain {
    seal: bool,
}

impl HashChain {
    /// `keccak256(blake2b256(data))`.
    pub const SECURE: Self = Self { seal: false };
    /// `sha256(keccak256(blake2b256(data)))`.
    pub const ACCOUNT_SEED: Self = Self { seal: true };

    /// Whether the final SHA-256 stage is applied.
    pub fn is_sealed(&self) -> bool {
        self.seal
    }

    /// Run the chain over `data`.
    pub fn digest(&self, data: &[u8]) -> Hash {
        let inner = keccak256(blake2b256(data).as_bytes());
        tracing::trace!(sealed = self.seal, input_len = data.len(), "hash chain");
        if self.seal {
            sha256(inner.as_bytes())
        } else {
            inner
        }
    }
}

/// Two-stage hash shared by the address encoder.
pub fn secure_hash(data: &[u8]) -> Hash {
    HashChain::SECURE.digest(data)
}

/// Errors from turning a seed phrase into hash input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("seed character {character:?} at position {position} is outside Latin-1")]
    UnsupportedCharacter { character: char, position: usize },
}

/// Encode a seed as Latin-1: one byte per character, U+0000 to U+00FF.
///
/// `position` in the error counts characters, not bytes.
pub fn seed_bytes(seed: &str) -> Result<Vec<u8>, SeedError> {
    seed.chars()
        .enumerate()
        .map(|(position, character)| {
            u8::try_from(u32::from(character))
                .map_err(|_| SeedError::UnsupportedCharacter { character, position })
        })
        .collect()
}

/// Hash a seed and nonce into the 32-byte account seed.
///
/// The input is the decimal text of `nonce` immediately followed by the
/// Latin-1 bytes of the seed, with no separator. `(1, "2ab")` and
/// `(12, "ab")` therefore hash identically; existing on-chain addresses
/// depend on this layout.
pub fn account_seed_hash(seed: &str, nonce: u64) -> Result<Hash, SeedError> {
    let mut input = nonce.to_string().into_bytes();
    input.extend(seed_bytes(seed)?);
    Ok(HashChain::ACCOUNT_SEED.digest(&input))
}
