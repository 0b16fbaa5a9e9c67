use hyperdrive_consensus::checkpoint::Checkpoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalityCheckpointsData {
    pub previous_justified: Checkpoint,
    pub current_justified: Checkpoint,
    pub finalized: Checkpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinalityCheckpoints {
    pub previous_justified_epoch: u64,
    pub current_justified_epoch: u64,
    pub finalized_epoch: u64,
}

impl From<FinalityCheckpointsData> for FinalityCheckpoints {
    fn from(data: FinalityCheckpointsData) -> Self {
        Self {
            previous_justified_epoch: data.previous_justified.epoch,
            current_justified_epoch: data.current_justified.epoch,
            finalized_epoch: data.finalized.epoch,
        }
    }
}

/// Where the chain is right now: the wall-clock epoch alongside the head state's checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeaconHead {
    pub epoch: u64,
    pub finalized_epoch: u64,
    pub justified_epoch: u64,
    pub previous_justified_epoch: u64,
}
