use alloy_primitives::{Address, B256};
use hyperdrive_bls::{BLSSignature, PubKey};
use hyperdrive_consensus::{
    bls_to_execution_change::{BLSToExecutionChange, SignedBLSToExecutionChange},
    misc::compute_signing_root,
};

/// The change moving `validator_index`'s withdrawals from `from_bls_pubkey` to
/// `to_execution_address`, and the root the withdrawal key signs.
pub fn bls_to_execution_change_signing_root(
    validator_index: u64,
    from_bls_pubkey: PubKey,
    to_execution_address: Address,
    domain: B256,
) -> (BLSToExecutionChange, B256) {
    let change = BLSToExecutionChange {
        validator_index,
        from_bls_pubkey,
        to_execution_address,
    };
    let signing_root = compute_signing_root(&change, domain);
    (change, signing_root)
}

pub fn sign_bls_to_execution_change(
    change: BLSToExecutionChange,
    signature: BLSSignature,
) -> SignedBLSToExecutionChange {
    SignedBLSToExecutionChange {
        message: change,
        signature,
    }
}
