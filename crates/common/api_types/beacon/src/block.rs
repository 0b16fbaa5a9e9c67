use alloy_primitives::{Address, B256};
use hyperdrive_bls::BLSSignature;
use serde::{Deserialize, Serialize};

use crate::attestation::{Attestation, AttestationInfo};

/// Only present on post-merge blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecutionPayloadSummary {
    pub fee_recipient: Address,
    #[serde(with = "serde_utils::quoted_u64")]
    pub block_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BeaconBlockBody {
    #[serde(default)]
    pub attestations: Vec<Attestation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_payload: Option<ExecutionPayloadSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BeaconBlockMessage {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: B256,
    pub state_root: B256,
    pub body: BeaconBlockBody,
}

/// `data` of `/eth/v2/beacon/blocks/{block_id}`, trimmed to what the core reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignedBeaconBlockData {
    pub message: BeaconBlockMessage,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeaconBlock {
    pub slot: u64,
    pub proposer_index: u64,
    pub has_execution_payload: bool,
    pub fee_recipient: Address,
    pub execution_block_number: u64,
    pub attestations: Vec<AttestationInfo>,
}

impl From<SignedBeaconBlockData> for BeaconBlock {
    fn from(block: SignedBeaconBlockData) -> Self {
        let message = block.message;
        let (has_execution_payload, fee_recipient, execution_block_number) =
            match message.body.execution_payload {
                Some(payload) => (true, payload.fee_recipient, payload.block_number),
                None => (false, Address::ZERO, 0),
            };

        Self {
            slot: message.slot,
            proposer_index: message.proposer_index,
            has_execution_payload,
            fee_recipient,
            execution_block_number,
            attestations: message
                .body
                .attestations
                .into_iter()
                .map(AttestationInfo::from)
                .collect(),
        }
    }
}
