use std::{fmt, str::FromStr};

use alloy_primitives::B256;
use hyperdrive_bls::PubKey;

use crate::validator::ValidatorData;

/// A `state_id` or `block_id` path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ID {
    Finalized,
    Genesis,
    Head,
    Justified,
    Slot(u64),
    Root(B256),
}

impl FromStr for ID {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finalized" => return Ok(ID::Finalized),
            "genesis" => return Ok(ID::Genesis),
            "head" => return Ok(ID::Head),
            "justified" => return Ok(ID::Justified),
            _ => {}
        }
        if s.starts_with("0x") {
            return B256::from_str(s)
                .map(ID::Root)
                .map_err(|err| format!("invalid root {s}: {err}"));
        }
        if is_decimal(s) {
            return s
                .parse()
                .map(ID::Slot)
                .map_err(|err| format!("invalid slot {s}: {err}"));
        }
        Err(format!("invalid state or block id: {s}"))
    }
}

impl fmt::Display for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ID::Finalized => write!(f, "finalized"),
            ID::Genesis => write!(f, "genesis"),
            ID::Head => write!(f, "head"),
            ID::Justified => write!(f, "justified"),
            ID::Slot(slot) => write!(f, "{slot}"),
            ID::Root(root) => write!(f, "{root}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidatorID {
    Index(u64),
    Pubkey(PubKey),
}

impl ValidatorID {
    /// Whether `validator` is the record this identifier asks for.
    pub fn matches(&self, validator: &ValidatorData) -> bool {
        match self {
            ValidatorID::Index(index) => validator.index == *index,
            ValidatorID::Pubkey(pubkey) => validator.validator.pubkey == *pubkey,
        }
    }
}

impl FromStr for ValidatorID {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            return PubKey::from_str(s)
                .map(ValidatorID::Pubkey)
                .map_err(|err| format!("invalid validator public key {s}: {err}"));
        }
        if is_decimal(s) {
            return s
                .parse()
                .map(ValidatorID::Index)
                .map_err(|err| format!("invalid validator index {s}: {err}"));
        }
        Err(format!("invalid validator id: {s}"))
    }
}

impl fmt::Display for ValidatorID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorID::Index(i) => write!(f, "{i}"),
            ValidatorID::Pubkey(pubkey) => write!(f, "{pubkey}"),
        }
    }
}

impl From<PubKey> for ValidatorID {
    fn from(pubkey: PubKey) -> Self {
        ValidatorID::Pubkey(pubkey)
    }
}

impl From<u64> for ValidatorID {
    fn from(index: u64) -> Self {
        ValidatorID::Index(index)
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|byte| byte.is_ascii_digit())
}

/// Which state a validator query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSelector {
    #[default]
    Head,
    Slot(u64),
    /// Resolved to the first slot of the epoch using the node's `SLOTS_PER_EPOCH`.
    Epoch(u64),
}
