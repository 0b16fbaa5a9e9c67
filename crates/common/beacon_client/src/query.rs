use std::collections::{HashMap, HashSet};

use futures::{FutureExt, StreamExt, TryStreamExt, future::BoxFuture, stream};
use hyperdrive_api_types_beacon::{
    error::{BeaconError, TransportError},
    id::{ID, StateSelector, ValidatorID},
    validator::{ValidatorData, ValidatorRecord},
};
use hyperdrive_bls::PubKey;
use hyperdrive_consensus::misc::compute_start_slot_at_epoch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::node::BeaconNode;

/// Start offset, identifiers and records of one answered request window.
type Window<'a> = (usize, &'a [ValidatorID], Vec<ValidatorData>);

/// Most validator identifiers sent in one `validators` request.
pub const MAX_BATCH: usize = 600;

/// Most `validators` requests in flight at once for a single query.
pub const CONCURRENCY: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    pub batch_size: usize,
    pub concurrency: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH,
            concurrency: CONCURRENCY,
        }
    }
}

impl QueryConfig {
    pub fn validate(&self) -> Result<(), BeaconError> {
        if self.batch_size == 0 {
            return Err(BeaconError::InvalidInput(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(BeaconError::InvalidInput(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fans a large validator lookup out over windows of `batch_size` identifiers, running at
/// most `concurrency` windows at a time.
pub struct ValidatorQueryEngine<'a, N: ?Sized> {
    node: &'a N,
    config: QueryConfig,
}

impl<'a, N: BeaconNode + ?Sized> ValidatorQueryEngine<'a, N> {
    pub fn new(node: &'a N, config: QueryConfig) -> Self {
        Self { node, config }
    }

    /// Looks up every identifier in `ids` at `state_id`.
    ///
    /// Records come back in the order of the identifiers that produced them; identifiers the
    /// node did not return are dropped. The first failing window aborts the whole query and
    /// drops the windows still in flight.
    pub async fn query(
        &self,
        state_id: &ID,
        ids: &[ValidatorID],
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidatorData>, BeaconError> {
        self.config.validate()?;
        if ids.is_empty() {
            return Ok(vec![]);
        }

        // Boxed and collected up front so the query future stays `Send` under `async_trait`.
        let windows: Vec<BoxFuture<'_, Result<Window<'_>, BeaconError>>> = ids
            .chunks(self.config.batch_size)
            .enumerate()
            .map(|(n, window)| {
                let offset = n * self.config.batch_size;
                async move {
                    if cancel.is_cancelled() {
                        return Err(BeaconError::from(TransportError::cancelled()));
                    }
                    debug!(
                        "Querying validators {offset}..{} at state {state_id}",
                        offset + window.len()
                    );
                    let records = self.node.validators(state_id, window, cancel).await?;
                    Ok((offset, window, records))
                }
                .boxed()
            })
            .collect();
        let mut windows = stream::iter(windows).buffer_unordered(self.config.concurrency);

        let mut slots: Vec<Option<ValidatorData>> = vec![None; ids.len()];
        while let Some((offset, window, records)) = windows.try_next().await? {
            let positions: HashMap<&ValidatorID, usize> = window
                .iter()
                .enumerate()
                .map(|(i, id)| (id, offset + i))
                .collect();

            for record in records {
                let position = positions
                    .get(&ValidatorID::Index(record.index))
                    .or_else(|| {
                        positions.get(&ValidatorID::Pubkey(record.validator.pubkey.clone()))
                    });
                if let Some(&position) = position {
                    slots[position] = Some(record);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Turns a selector into a state id, fetching the beacon config for epochs.
    pub async fn resolve_state(
        &self,
        state: StateSelector,
        cancel: &CancellationToken,
    ) -> Result<ID, BeaconError> {
        match state {
            StateSelector::Head => Ok(ID::Head),
            StateSelector::Slot(slot) => Ok(ID::Slot(slot)),
            StateSelector::Epoch(epoch) => {
                let config = self.node.beacon_config(cancel).await?;
                compute_start_slot_at_epoch(epoch, config.slots_per_epoch)
                    .map(ID::Slot)
                    .ok_or_else(|| {
                        BeaconError::InvalidInput(format!("Epoch {epoch} is out of range"))
                    })
            }
        }
    }

    /// One entry per distinct key in `pubkeys`. The all-zero key and keys that are not valid
    /// BLS points are never sent to the node and map to [ValidatorRecord::null], as do keys
    /// the node does not know.
    pub async fn statuses_by_pubkey(
        &self,
        pubkeys: &[PubKey],
        state: StateSelector,
        cancel: &CancellationToken,
    ) -> Result<HashMap<PubKey, ValidatorRecord>, BeaconError> {
        let mut statuses = HashMap::with_capacity(pubkeys.len());
        let mut ids = vec![];
        for pubkey in pubkeys {
            if statuses.contains_key(pubkey) {
                continue;
            }
            statuses.insert(pubkey.clone(), ValidatorRecord::null());
            if !pubkey.is_zero() && pubkey.is_valid() {
                ids.push(ValidatorID::Pubkey(pubkey.clone()));
            }
        }

        if ids.is_empty() {
            return Ok(statuses);
        }

        let state_id = self.resolve_state(state, cancel).await?;
        for data in self.query(&state_id, &ids, cancel).await? {
            let pubkey = data.validator.pubkey.clone();
            statuses.insert(pubkey, ValidatorRecord::from(data));
        }

        Ok(statuses)
    }

    /// Records for the indices the node knows about, in the order they were requested.
    pub async fn statuses_by_index(
        &self,
        indices: &[u64],
        state: StateSelector,
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidatorRecord>, BeaconError> {
        let mut seen = HashSet::with_capacity(indices.len());
        let ids: Vec<ValidatorID> = indices
            .iter()
            .filter(|index| seen.insert(**index))
            .map(|index| ValidatorID::Index(*index))
            .collect();

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let state_id = self.resolve_state(state, cancel).await?;
        Ok(self
            .query(&state_id, &ids, cancel)
            .await?
            .into_iter()
            .map(ValidatorRecord::from)
            .collect())
    }
}
