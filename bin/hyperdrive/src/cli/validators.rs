use clap::Parser;
use hyperdrive_api_types_beacon::{id::StateSelector, validator::ValidatorRecord};
use hyperdrive_bls::PubKey;

use crate::cli::BeaconClientArgs;

#[derive(Debug, Parser)]
pub struct ValidatorsConfig {
    #[command(flatten)]
    pub beacon: BeaconClientArgs,

    #[arg(long, required = true, value_delimiter = ',', help = "Comma separated validator public keys")]
    pub pubkeys: Vec<PubKey>,

    #[arg(long, conflicts_with = "slot", help = "Query the state at the first slot of this epoch")]
    pub epoch: Option<u64>,

    #[arg(long, help = "Query the state at this slot")]
    pub slot: Option<u64>,
}

impl ValidatorsConfig {
    pub fn state_selector(&self) -> StateSelector {
        match (self.epoch, self.slot) {
            (Some(epoch), _) => StateSelector::Epoch(epoch),
            (None, Some(slot)) => StateSelector::Slot(slot),
            (None, None) => StateSelector::Head,
        }
    }
}

pub fn record_line(pubkey: &PubKey, record: Option<&ValidatorRecord>) -> String {
    match record {
        Some(record) if record.exists => format!(
            "{pubkey} index={} status={} active={} balance={} effective_balance={}",
            record.index,
            record
                .status
                .map(|status| status.to_string())
                .unwrap_or_default(),
            record.status.is_some_and(|status| status.is_active()),
            record.balance,
            record.effective_balance
        ),
        _ => format!("{pubkey} not found"),
    }
}
