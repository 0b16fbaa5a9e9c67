use alloy_primitives::{aliases::B32, fixed_bytes};

pub const DOMAIN_BLS_TO_EXECUTION_CHANGE: B32 = fixed_bytes!("0x0A000000");
pub const DOMAIN_DEPOSIT: B32 = fixed_bytes!("0x03000000");
pub const DOMAIN_VOLUNTARY_EXIT: B32 = fixed_bytes!("0x04000000");
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: &[u8] = &[0x01];
pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;
pub const GENESIS_FORK_VERSION: B32 = fixed_bytes!("0x00000000");
