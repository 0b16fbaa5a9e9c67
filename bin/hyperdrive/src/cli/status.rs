use clap::Parser;
use hyperdrive_api_types_beacon::finality::BeaconHead;
use hyperdrive_beacon_client::FailoverStatus;

use crate::cli::BeaconClientArgs;

#[derive(Debug, Parser)]
pub struct StatusConfig {
    #[command(flatten)]
    pub beacon: BeaconClientArgs,
}

/// One line per configured node, rendered from a health check without further requests.
pub fn health_report(status: &FailoverStatus) -> String {
    let fallback = status
        .fallback
        .as_ref()
        .map_or_else(|| "not configured".to_string(), ToString::to_string);
    format!("primary:  {}\nfallback: {fallback}", status.primary)
}

pub fn head_report(head: &BeaconHead) -> String {
    format!(
        "epoch {}, justified {}, previous justified {}, finalized {}",
        head.epoch, head.justified_epoch, head.previous_justified_epoch, head.finalized_epoch
    )
}
