use alloy_primitives::{B256, aliases::B32};
use hyperdrive_api_types_beacon::{config::BeaconConfig, error::BeaconError};
use hyperdrive_beacon_client::BeaconNode;
use hyperdrive_consensus::{genesis::Genesis, misc::compute_domain};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Which fork version a domain is computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkSelector {
    /// BLS to execution changes are signed under the genesis fork on every network.
    Genesis,
    /// Voluntary exits are pinned to Capella since EIP-7044.
    Capella,
}

impl ForkSelector {
    pub fn fork_version(&self, genesis: &Genesis, config: &BeaconConfig) -> B32 {
        match self {
            ForkSelector::Genesis => genesis.genesis_fork_version,
            ForkSelector::Capella => config.capella_fork_version,
        }
    }
}

/// Signing domain for `domain_type` on the node's network.
///
/// The fork version comes from `fork` alone, so the result is the same for every `epoch`.
pub async fn get_domain_data<N: BeaconNode + ?Sized>(
    node: &N,
    domain_type: B32,
    epoch: u64,
    fork: ForkSelector,
    cancel: &CancellationToken,
) -> Result<B256, BeaconError> {
    let (genesis, config) = futures::try_join!(node.genesis(cancel), node.beacon_config(cancel))?;
    let fork_version = fork.fork_version(&genesis, &config);
    debug!("Computing domain {domain_type} at epoch {epoch} with fork version {fork_version}");

    Ok(compute_domain(
        domain_type,
        fork_version,
        genesis.genesis_validators_root,
    ))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{b256, fixed_bytes};
    use hyperdrive_consensus::constants::{DOMAIN_BLS_TO_EXECUTION_CHANGE, DOMAIN_VOLUNTARY_EXIT};

    use super::*;

    fn genesis() -> Genesis {
        Genesis {
            genesis_time: 1_606_824_023,
            genesis_validators_root: b256!(
                "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95"
            ),
            genesis_fork_version: fixed_bytes!("0x00000000"),
        }
    }

    fn config() -> BeaconConfig {
        BeaconConfig {
            seconds_per_slot: 12,
            slots_per_epoch: 32,
            seconds_per_epoch: 384,
            epochs_per_sync_committee_period: 256,
            capella_fork_version: fixed_bytes!("0x03000000"),
        }
    }

    #[test]
    fn test_fork_selection() {
        assert_eq!(
            ForkSelector::Genesis.fork_version(&genesis(), &config()),
            fixed_bytes!("0x00000000")
        );
        assert_eq!(
            ForkSelector::Capella.fork_version(&genesis(), &config()),
            fixed_bytes!("0x03000000")
        );
    }

    #[test]
    fn test_mainnet_domains() {
        let exit_domain = compute_domain(
            DOMAIN_VOLUNTARY_EXIT,
            ForkSelector::Capella.fork_version(&genesis(), &config()),
            genesis().genesis_validators_root,
        );
        assert_eq!(
            exit_domain,
            b256!("0x04000000bba4da96354c9f25476cf1bc69bf583a7f9e0af049305b62de676640")
        );

        let bls_change_domain = compute_domain(
            DOMAIN_BLS_TO_EXECUTION_CHANGE,
            ForkSelector::Genesis.fork_version(&genesis(), &config()),
            genesis().genesis_validators_root,
        );
        assert_eq!(
            bls_change_domain,
            b256!("0x0a000000b5303f2ad2010d699a76c8e62350947421a3e4a979779642cfdb0f66")
        );
    }
}
