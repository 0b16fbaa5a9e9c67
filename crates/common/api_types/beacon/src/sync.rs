use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct SyncStatus {
    #[serde(with = "serde_utils::quoted_u64")]
    pub head_slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub sync_distance: u64,
    pub is_syncing: bool,
    #[serde(default)]
    pub is_optimistic: bool,
    #[serde(default)]
    pub el_offline: bool,
}

impl SyncStatus {
    /// Fraction of the chain the node has processed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.head_slot as f64 + self.sync_distance as f64;
        if total == 0.0 {
            return 1.0;
        }
        self.head_slot as f64 / total
    }
}
