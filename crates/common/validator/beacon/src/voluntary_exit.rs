use alloy_primitives::B256;
use hyperdrive_api_types_beacon::error::BeaconError;
use hyperdrive_bls::BLSSignature;
use hyperdrive_consensus::{
    misc::compute_signing_root,
    voluntary_exit::{SignedVoluntaryExit, VoluntaryExit},
};

/// Parses a validator index the way the beacon API writes them: plain decimal digits.
pub fn parse_validator_index(validator_index: &str) -> Result<u64, BeaconError> {
    if validator_index.is_empty() || !validator_index.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(BeaconError::InvalidInput(format!(
            "Invalid validator index {validator_index:?}"
        )));
    }
    validator_index.parse().map_err(|err| {
        BeaconError::InvalidInput(format!("Invalid validator index {validator_index:?}: {err}"))
    })
}

/// The exit message for `validator_index` at `epoch` and the root the validator key signs.
pub fn voluntary_exit_signing_root(
    validator_index: u64,
    epoch: u64,
    domain: B256,
) -> (VoluntaryExit, B256) {
    let voluntary_exit = VoluntaryExit {
        epoch,
        validator_index,
    };
    let signing_root = compute_signing_root(&voluntary_exit, domain);
    (voluntary_exit, signing_root)
}

pub fn sign_voluntary_exit(
    voluntary_exit: VoluntaryExit,
    signature: BLSSignature,
) -> SignedVoluntaryExit {
    SignedVoluntaryExit {
        message: voluntary_exit,
        signature,
    }
}
