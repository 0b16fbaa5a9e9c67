use std::{fmt, str::FromStr};

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U48};
use tree_hash_derive::TreeHash;

use crate::errors::BLSError;

pub const PUBKEY_BYTES_LEN: usize = 48;

/// A compressed BLS12-381 G1 public key as it appears on the wire.
///
/// The bytes are not checked to be a valid curve point on construction; see
/// [PubKey::is_valid] for that.
#[derive(Debug, PartialEq, Clone, Encode, Decode, TreeHash, Default, Eq, Hash)]
pub struct PubKey {
    pub inner: FixedVector<u8, U48>,
}

impl PubKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BLSError> {
        if bytes.len() != PUBKEY_BYTES_LEN {
            return Err(BLSError::InvalidByteLength {
                expected: PUBKEY_BYTES_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            inner: FixedVector::from(bytes.to_vec()),
        })
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.inner[..]
    }

    /// The all-zero key, used as the "no validator" placeholder.
    pub fn is_zero(&self) -> bool {
        self.inner.iter().all(|byte| *byte == 0)
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for PubKey {
    type Err = BLSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clean_str = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(clean_str).map_err(|_| BLSError::InvalidHexString)?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for PubKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PubKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        PubKey::from_str(&result).map_err(serde::de::Error::custom)
    }
}
