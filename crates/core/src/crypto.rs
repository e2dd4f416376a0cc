//! Curve25519 keys derived from an account seed hash, plus signing and
//! verification.
//!
//! Keys live on the Montgomery form of the curve (X25519 encoding). Signatures
//! are Ed25519 signatures made with the same scalar; the sign bit of the
//! matching Edwards public key travels in the top bit of the signature's last
//! byte so a verifier holding only the Montgomery key can rebuild it.

use crate::hash::Hash;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::scalar::{clamp_integer, Scalar};
use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::fmt;
use thiserror::Error;

/// Length of private keys, public keys and seed hashes.
pub const KEY_LENGTH: usize = 32;

/// Length of a signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// Domain prefix hashed in front of the private key when deriving a nonce.
const NONCE_PREFIX: [u8; 32] = {
    let mut prefix = [0xFF; 32];
    prefix[0] = 0xFE;
    prefix
};

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid key material: expected {expected} bytes, got {actual}")]
    InvalidKeyMaterial { expected: usize, actual: usize },
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("signature verification failed")]
    VerificationFailed,
}

fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CryptoError> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKeyMaterial {
            expected: N,
            actual: bytes.len(),
        })
}

fn scalar_from_sha512(parts: &[&[u8]]) -> Scalar {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// A clamped Curve25519 private scalar.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; KEY_LENGTH]);

impl PrivateKey {
    /// Clamp a 32-byte seed hash into a private key.
    pub fn from_seed_hash(seed_hash: &Hash) -> Self {
        Self(clamp_integer(seed_hash.0))
    }

    /// Import a private key, clamping it. Clamping is idempotent, so keys
    /// produced by [`PrivateKey::from_seed_hash`] round-trip unchanged.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(clamp_integer(to_array(bytes)?)))
    }

    /// Get the raw bytes.
    pub fn to_bytes(&self) -> [u8; KEY_LENGTH] {
        self.0
    }

    /// Base-point multiplication on the Montgomery curve.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(MontgomeryPoint::mul_base_clamped(self.0).to_bytes())
    }

    fn scalar(&self) -> Scalar {
        Scalar::from_bytes_mod_order(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A Curve25519 public key (Montgomery u-coordinate).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; KEY_LENGTH]);

impl PublicKey {
    /// Create a public key from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self(to_array(bytes)?))
    }

    /// Get the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base-58 text form, as node APIs expect it.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// Verify a signature produced by [`KeyPair::sign`].
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        let mut sig = signature.0;
        let sign_bit = sig[63] >> 7;
        sig[63] &= 0x7F;

        let edwards = MontgomeryPoint(self.0)
            .to_edwards(sign_bit)
            .ok_or(CryptoError::InvalidPublicKey)?;
        let key = VerifyingKey::from_bytes(edwards.compress().as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey)?;

        key.verify(message, &DalekSignature::from_bytes(&sig))
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.0[..8]))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A Curve25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Create a signature from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Base-58 text form, as node APIs expect it.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

/// A Curve25519 key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Derive the key pair for an account seed hash.
    pub fn from_seed_hash(seed_hash: &Hash) -> Self {
        Self::from_private_key(PrivateKey::from_seed_hash(seed_hash))
    }

    /// Derive from a raw seed hash slice, which must be exactly 32 bytes.
    pub fn derive(seed_hash: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; KEY_LENGTH] = to_array(seed_hash)?;
        Ok(Self::from_seed_hash(&Hash(bytes)))
    }

    /// Build a key pair around an existing private key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Sign a message with fresh randomness from the OS.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let mut random = [0u8; 64];
        OsRng.fill_bytes(&mut random);
        self.sign_with_randomness(message, &random)
    }

    /// Sign a message with caller-supplied randomness.
    ///
    /// The nonce is `sha512(0xFE ff..ff || private key || message || random)`.
    /// Equal randomness gives equal signatures.
    pub fn sign_with_randomness(&self, message: &[u8], random: &[u8; 64]) -> Signature {
        let a = self.private_key.scalar();
        let public_edwards: CompressedEdwardsY = EdwardsPoint::mul_base(&a).compress();

        let r = scalar_from_sha512(&[&NONCE_PREFIX, &self.private_key.0, message, random]);
        let big_r = EdwardsPoint::mul_base(&r).compress();
        let k = scalar_from_sha512(&[big_r.as_bytes(), public_edwards.as_bytes(), message]);
        let s = k * a + r;

        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(big_r.as_bytes());
        bytes[32..].copy_from_slice(s.as_bytes());
        bytes[63] |= public_edwards.as_bytes()[31] & 0x80;
        Signature(bytes)
    }

    /// Verify a signature against our public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CryptoError> {
        self.public_key.verify(message, signature)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
