//! Chain identifiers and the chain handle that carries a node client.

use crate::client::Offline;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a chain identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainIdError {
    #[error("invalid chain identifier {0:?}: expected \"mainnet\", \"testnet\" or a single ASCII character")]
    Invalid(String),
    #[error("chain tag 0x{0:02x} is not a printable ASCII character")]
    NonGraphicTag(u8),
}

/// One-byte network tag embedded in every address.
///
/// The tag is always a printable ASCII character (`!` through `~`), so its
/// one-character text form parses back to the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u8);

impl ChainId {
    pub const MAINNET: Self = Self(b'M');
    pub const TESTNET: Self = Self(b'T');

    /// Wrap a tag byte, rejecting anything that is not printable ASCII.
    pub fn new(tag: u8) -> Result<Self, ChainIdError> {
        if tag.is_ascii_graphic() {
            Ok(Self(tag))
        } else {
            Err(ChainIdError::NonGraphicTag(tag))
        }
    }

    pub(crate) const fn from_checked_tag(tag: u8) -> Self {
        Self(tag)
    }

    /// The raw tag byte.
    pub fn tag(&self) -> u8 {
        self.0
    }

    /// Human name for the well-known networks.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::MAINNET => Some("mainnet"),
            Self::TESTNET => Some("testnet"),
            _ => None,
        }
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::TESTNET
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({:?})", char::from(self.0))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.0))
    }
}

impl FromStr for ChainId {
    type Err = ChainIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => return Ok(Self::MAINNET),
            "testnet" => return Ok(Self::TESTNET),
            _ => {}
        }
        match s.as_bytes() {
            [tag] if tag.is_ascii_graphic() => Ok(Self(*tag)),
            _ => Err(ChainIdError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<u8> for ChainId {
    type Error = ChainIdError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A network: its identifier plus the client used to reach its node.
#[derive(Debug, Clone)]
pub struct Chain<C> {
    id: ChainId,
    client: C,
}

impl<C> Chain<C> {
    pub fn new(id: ChainId, client: C) -> Self {
        Self { id, client }
    }

    pub fn mainnet(client: C) -> Self {
        Self::new(ChainId::MAINNET, client)
    }

    pub fn testnet(client: C) -> Self {
        Self::new(ChainId::TESTNET, client)
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl Chain<Offline> {
    /// A chain with no node behind it, for pure derivation.
    pub fn offline(id: ChainId) -> Self {
        Self::new(id, Offline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_networks() {
        assert_eq!("mainnet".parse::<ChainId>().unwrap(), ChainId::MAINNET);
        assert_eq!("TestNet".parse::<ChainId>().unwrap(), ChainId::TESTNET);
    }

    #[test]
    fn test_parse_single_character() {
        assert_eq!("T".parse::<ChainId>().unwrap(), ChainId::TESTNET);
        assert_eq!("M".parse::<ChainId>().unwrap(), ChainId::MAINNET);
        assert_eq!("X".parse::<ChainId>().unwrap().tag(), b'X');
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ChainId>().is_err());
        assert!("TT".parse::<ChainId>().is_err());
        assert!(" ".parse::<ChainId>().is_err());
        assert!("é".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_display_and_name() {
        assert_eq!(ChainId::TESTNET.to_string(), "T");
        assert_eq!(ChainId::MAINNET.name(), Some("mainnet"));
        assert_eq!(ChainId::new(b'X').unwrap().name(), None);
    }

    #[test]
    fn test_new_rejects_non_graphic_tags() {
        assert_eq!(ChainId::new(b'T').unwrap(), ChainId::TESTNET);
        assert_eq!(ChainId::new(b' '), Err(ChainIdError::NonGraphicTag(b' ')));
        assert_eq!(ChainId::new(0x00), Err(ChainIdError::NonGraphicTag(0x00)));
        assert_eq!(ChainId::new(0x7f), Err(ChainIdError::NonGraphicTag(0x7f)));
        assert!(ChainId::try_from(0xe9).is_err());
    }

    #[test]
    fn test_every_tag_roundtrips_through_serde() {
        for tag in 0u8..=255 {
            let Ok(id) = ChainId::new(tag) else { continue };
            let json = serde_json::to_string(&id).unwrap();
            let back: ChainId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ChainId::MAINNET).unwrap();
        assert_eq!(json, "\"M\"");
        let parsed: ChainId = serde_json::from_str("\"testnet\"").unwrap();
        assert_eq!(parsed, ChainId::TESTNET);
    }

    #[test]
    fn test_offline_chain() {
        let chain = Chain::offline(ChainId::TESTNET);
        assert_eq!(chain.id(), ChainId::TESTNET);
    }
}
