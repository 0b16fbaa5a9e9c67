use alloy_primitives::B256;
use hyperdrive_bls::PubKey;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::constants::ETH1_ADDRESS_WITHDRAWAL_PREFIX;

/// The registry entry of a validator, as the `validator` field of a `validators` response.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    pub pubkey: PubKey,

    /// 0x00 prefix: BLS withdrawal key hash. 0x01 prefix: execution address.
    pub withdrawal_credentials: B256,

    #[serde(with = "serde_utils::quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,

    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub exit_epoch: u64,

    #[serde(with = "serde_utils::quoted_u64")]
    pub withdrawable_epoch: u64,
}

impl Validator {
    /// Whether withdrawals already go to an execution address.
    pub fn has_eth1_withdrawal_credential(&self) -> bool {
        &self.withdrawal_credentials[..1] == ETH1_ADDRESS_WITHDRAWAL_PREFIX
    }
}
