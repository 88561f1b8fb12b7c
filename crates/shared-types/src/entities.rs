//! # Core Value Types
//!
//! - **Identity**: [`Id`], with [`BlockId`] and [`MessageId`] aliases
//! - **Time**: [`Timestamp`] (unix seconds)
//! - **Lifecycle**: [`ChainState`] reported by the consensus driver

use crate::errors::IdError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A 32-byte identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub [u8; 32]);

/// Identifier of a block: the SHA-256 hash of its canonical encoding.
pub type BlockId = Id;

/// Opaque identifier of an application message.
pub type MessageId = Id;

impl Id {
    /// The all-zero identifier.
    pub const EMPTY: Id = Id([0u8; 32]);

    /// Length of an identifier in bytes.
    pub const LEN: usize = 32;

    /// Build an identifier from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| IdError::InvalidLength(bytes.len()))?;
        Ok(Id(arr))
    }

    /// Raw bytes of the identifier.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// True for the all-zero identifier.
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Id {
    fn from(bytes: [u8; 32]) -> Self {
        Id(bytes)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({}..)", &self.to_hex()[..8])
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| IdError::InvalidHex(e.to_string()))?;
        Id::from_slice(&bytes)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Id)
        }
    }
}

/// SHA-256 of `data` as an [`Id`].
pub fn hash256(data: &[u8]) -> Id {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Id(out)
}

/// Lifecycle phase reported by the consensus driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChainState {
    /// Engine is starting up.
    #[default]
    Initializing,
    /// Fetching a state summary.
    StateSyncing,
    /// Catching up with the network.
    Bootstrapping,
    /// Normal operation.
    NormalOp,
}
