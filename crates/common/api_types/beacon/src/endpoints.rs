//! Beacon REST paths used by the core. These strings are the wire contract.

use crate::id::ID;

pub const SYNC_STATUS_PATH: &str = "/eth/v1/node/syncing";
pub const CONFIG_SPEC_PATH: &str = "/eth/v1/config/spec";
pub const DEPOSIT_CONTRACT_PATH: &str = "/eth/v1/config/deposit_contract";
pub const GENESIS_PATH: &str = "/eth/v1/beacon/genesis";
pub const VOLUNTARY_EXITS_PATH: &str = "/eth/v1/beacon/pool/voluntary_exits";
pub const BLS_TO_EXECUTION_CHANGES_PATH: &str = "/eth/v1/beacon/pool/bls_to_execution_changes";

pub fn finality_checkpoints_path(state_id: &ID) -> String {
    format!("/eth/v1/beacon/states/{state_id}/finality_checkpoints")
}

pub fn fork_path(state_id: &ID) -> String {
    format!("/eth/v1/beacon/states/{state_id}/fork")
}

pub fn validators_path(state_id: &ID) -> String {
    format!("/eth/v1/beacon/states/{state_id}/validators")
}

pub fn committees_path(state_id: &ID) -> String {
    format!("/eth/v1/beacon/states/{state_id}/committees")
}

pub fn attestations_path(block_id: &ID) -> String {
    format!("/eth/v1/beacon/blocks/{block_id}/attestations")
}

pub fn beacon_block_path(block_id: &ID) -> String {
    format!("/eth/v2/beacon/blocks/{block_id}")
}

pub fn sync_duties_path(epoch: u64) -> String {
    format!("/eth/v1/validator/duties/sync/{epoch}")
}

pub fn proposer_duties_path(epoch: u64) -> String {
    format!("/eth/v1/validator/duties/proposer/{epoch}")
}
