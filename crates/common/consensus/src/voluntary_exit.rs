use hyperdrive_bls::BLSSignature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BLSSignature,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct VoluntaryExit {
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use sha2::{Digest, Sha256};
    use tree_hash::TreeHash;

    use super::*;

    #[test]
    fn test_voluntary_exit_hash_tree_root() {
        let voluntary_exit = VoluntaryExit {
            epoch: 200000,
            validator_index: 42,
        };

        // Two uint64 leaves, each little-endian and right-padded to a 32-byte chunk.
        let mut chunks = [0u8; 64];
        chunks[..8].copy_from_slice(&200000u64.to_le_bytes());
        chunks[32..40].copy_from_slice(&42u64.to_le_bytes());
        let expected = B256::from_slice(&Sha256::digest(chunks));

        assert_eq!(voluntary_exit.tree_hash_root(), expected);
    }

    #[test]
    fn test_voluntary_exit_json_uses_quoted_integers() {
        let voluntary_exit = VoluntaryExit {
            epoch: 200000,
            validator_index: 42,
        };
        assert_eq!(
            serde_json::to_string(&voluntary_exit).unwrap(),
            r#"{"epoch":"200000","validator_index":"42"}"#
        );
    }
}
