use alloy_primitives::{B256, Bytes};
use hyperdrive_bls::BLSSignature;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttestationData {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    pub beacon_block_root: B256,
}

/// An attestation as returned by the block attestations endpoint. Only the fields the core
/// reads are kept; source/target checkpoints and committee bits are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attestation {
    pub aggregation_bits: Bytes,
    pub data: AttestationData,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttestationInfo {
    pub slot: u64,
    pub committee_index: u64,
    /// SSZ bitlist: one bit per committee member plus a trailing length bit.
    pub aggregation_bits: Bytes,
}

impl From<Attestation> for AttestationInfo {
    fn from(attestation: Attestation) -> Self {
        Self {
            slot: attestation.data.slot,
            committee_index: attestation.data.index,
            aggregation_bits: attestation.aggregation_bits,
        }
    }
}
