use alloy_primitives::{B256, aliases::B32};
use tree_hash::TreeHash;

use crate::{fork_data::ForkData, signing_data::SigningData};

pub mod checksummed_address {
    use alloy_primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let checksummed = address.to_checksum(None);
        serializer.serialize_str(&checksummed)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse::<Address>().map_err(D::Error::custom)
    }
}

/// Return the signing root for the corresponding signing data.
pub fn compute_signing_root<SSZObject: TreeHash>(ssz_object: &SSZObject, domain: B256) -> B256 {
    SigningData {
        object_root: ssz_object.tree_hash_root(),
        domain,
    }
    .tree_hash_root()
}

/// The domain type followed by the first 28 bytes of the fork data root.
pub fn compute_domain(
    domain_type: B32,
    fork_version: B32,
    genesis_validators_root: B256,
) -> B256 {
    let fork_data_root = ForkData {
        current_version: fork_version,
        genesis_validators_root,
    }
    .compute_fork_data_root();
    let domain_bytes = [&domain_type.0, &fork_data_root.0[..28]].concat();
    B256::from_slice(&domain_bytes)
}

/// Return the start slot of ``epoch``, or `None` if it does not fit in a `u64`.
pub fn compute_start_slot_at_epoch(epoch: u64, slots_per_epoch: u64) -> Option<u64> {
    epoch.checked_mul(slots_per_epoch)
}
