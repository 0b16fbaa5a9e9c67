use std::{
    collections::HashMap,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use hyperdrive_api_types_beacon::{
    attestation::AttestationInfo,
    block::BeaconBlock,
    committee::Committee,
    config::{BeaconConfig, DepositContract},
    error::BeaconError,
    finality::{BeaconHead, FinalityCheckpoints},
    id::{ID, StateSelector, ValidatorID},
    sync::SyncStatus,
    validator::{ValidatorData, ValidatorRecord},
};
use hyperdrive_bls::PubKey;
use hyperdrive_consensus::{
    bls_to_execution_change::SignedBLSToExecutionChange, fork::Fork, genesis::Genesis,
    voluntary_exit::SignedVoluntaryExit,
};
use tokio_util::sync::CancellationToken;

use crate::query::{QueryConfig, ValidatorQueryEngine};

/// The typed operation surface of a beacon node.
///
/// [crate::BeaconApiClient] implements it against one node and [crate::FailoverManager]
/// implements it on top of a primary and an optional fallback, so callers can be written
/// against either. The provided methods are compositions of the required ones and inherit
/// whatever failover behaviour the implementor gives those.
#[async_trait]
pub trait BeaconNode: Send + Sync {
    fn query_config(&self) -> QueryConfig;

    async fn sync_status(&self, cancel: &CancellationToken) -> Result<SyncStatus, BeaconError>;

    /// Fails with a decode error if the node's reported `SECONDS_PER_EPOCH` disagrees with
    /// `SECONDS_PER_SLOT * SLOTS_PER_EPOCH`.
    async fn beacon_config(&self, cancel: &CancellationToken) -> Result<BeaconConfig, BeaconError>;

    async fn deposit_contract(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DepositContract, BeaconError>;

    async fn genesis(&self, cancel: &CancellationToken) -> Result<Genesis, BeaconError>;

    async fn finality_checkpoints(
        &self,
        state_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<FinalityCheckpoints, BeaconError>;

    async fn fork(&self, state_id: &ID, cancel: &CancellationToken) -> Result<Fork, BeaconError>;

    async fn committees(
        &self,
        state_id: &ID,
        epoch: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Committee>, BeaconError>;

    /// One `validators` request. `ids` must not be longer than the configured batch size.
    /// Identifiers the node does not know are simply absent from the result.
    async fn validators(
        &self,
        state_id: &ID,
        ids: &[ValidatorID],
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidatorData>, BeaconError>;

    /// `None` when the block has not been produced (404).
    async fn attestations(
        &self,
        block_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<AttestationInfo>>, BeaconError>;

    /// `None` when the block has not been produced (404).
    async fn beacon_block(
        &self,
        block_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<Option<BeaconBlock>, BeaconError>;

    /// Whether each index is in the sync committee at `epoch`. Every index gets an entry.
    async fn validator_sync_duties(
        &self,
        indices: &[u64],
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<HashMap<u64, bool>, BeaconError>;

    /// Number of proposals each index has at `epoch`, counted as 0 or 1. Every index gets an
    /// entry.
    async fn validator_proposer_duties(
        &self,
        indices: &[u64],
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<HashMap<u64, u64>, BeaconError>;

    /// `Ok(true)` once the node accepted the exit into its pool.
    async fn submit_voluntary_exit(
        &self,
        exit: &SignedVoluntaryExit,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError>;

    async fn submit_bls_to_execution_change(
        &self,
        change: &SignedBLSToExecutionChange,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError>;

    async fn beacon_head(&self, cancel: &CancellationToken) -> Result<BeaconHead, BeaconError> {
        let (genesis, config, checkpoints) = futures::try_join!(
            self.genesis(cancel),
            self.beacon_config(cancel),
            self.finality_checkpoints(&ID::Head, cancel),
        )?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        Ok(BeaconHead {
            epoch: wall_clock_epoch(now, genesis.genesis_time, config.seconds_per_epoch),
            finalized_epoch: checkpoints.finalized_epoch,
            justified_epoch: checkpoints.current_justified_epoch,
            previous_justified_epoch: checkpoints.previous_justified_epoch,
        })
    }

    async fn validator_status(
        &self,
        id: &ValidatorID,
        state: StateSelector,
        cancel: &CancellationToken,
    ) -> Result<ValidatorRecord, BeaconError> {
        match id {
            ValidatorID::Pubkey(pubkey) => {
                let mut statuses = self
                    .validator_statuses(std::slice::from_ref(pubkey), state, cancel)
                    .await?;
                Ok(statuses.remove(pubkey).unwrap_or_else(ValidatorRecord::null))
            }
            ValidatorID::Index(index) => {
                let records = self
                    .validator_statuses_by_index(&[*index], state, cancel)
                    .await?;
                Ok(records.into_iter().next().unwrap_or_else(ValidatorRecord::null))
            }
        }
    }

    /// The returned map has exactly one entry per distinct requested key. Keys the node does
    /// not know, the all-zero key and keys that are not valid BLS points map to
    /// [ValidatorRecord::null].
    async fn validator_statuses(
        &self,
        pubkeys: &[PubKey],
        state: StateSelector,
        cancel: &CancellationToken,
    ) -> Result<HashMap<PubKey, ValidatorRecord>, BeaconError> {
        ValidatorQueryEngine::new(self, self.query_config())
            .statuses_by_pubkey(pubkeys, state, cancel)
            .await
    }

    async fn validator_statuses_by_index(
        &self,
        indices: &[u64],
        state: StateSelector,
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidatorRecord>, BeaconError> {
        ValidatorQueryEngine::new(self, self.query_config())
            .statuses_by_index(indices, state, cancel)
            .await
    }

    async fn validator_index(
        &self,
        pubkey: &PubKey,
        cancel: &CancellationToken,
    ) -> Result<u64, BeaconError> {
        let ids = [ValidatorID::Pubkey(pubkey.clone())];
        self.validators(&ID::Head, &ids, cancel)
            .await?
            .into_iter()
            .find(|data| ids[0].matches(data))
            .map(|data| data.index)
            .ok_or_else(|| BeaconError::NotFound(format!("Validator with pubkey {pubkey}")))
    }
}

/// Epoch the chain is in at unix time `now`, or 0 before genesis.
pub fn wall_clock_epoch(now: u64, genesis_time: u64, seconds_per_epoch: u64) -> u64 {
    now.saturating_sub(genesis_time)
        .checked_div(seconds_per_epoch)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_epoch() {
        let genesis = 1_606_824_023;
        assert_eq!(wall_clock_epoch(genesis - 10, genesis, 384), 0);
        assert_eq!(wall_clock_epoch(genesis, genesis, 384), 0);
        assert_eq!(wall_clock_epoch(genesis + 383, genesis, 384), 0);
        assert_eq!(wall_clock_epoch(genesis + 384, genesis, 384), 1);
        assert_eq!(wall_clock_epoch(genesis + 384 * 200_000, genesis, 384), 200_000);
    }

    #[test]
    fn test_wall_clock_epoch_without_epoch_length() {
        assert_eq!(wall_clock_epoch(100, 0, 0), 0);
    }
}
