//! JSON envelopes the beacon REST API wraps its payloads in.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// `{"data": T}`, used by the node, config and genesis endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// State and block queries add finality metadata next to `data`. Older nodes omit it.
#[derive(Debug, Serialize, Deserialize)]
pub struct BeaconResponse<T> {
    #[serde(default)]
    pub execution_optimistic: bool,
    #[serde(default)]
    pub finalized: bool,
    pub data: T,
}

impl<T> BeaconResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            execution_optimistic: false,
            finalized: false,
            data,
        }
    }
}

/// Fork-dependent payloads (`/eth/v2/...`) name the fork they were encoded for.
#[derive(Debug, Serialize, Deserialize)]
pub struct BeaconVersionedResponse<T> {
    pub version: String,
    #[serde(default)]
    pub execution_optimistic: bool,
    #[serde(default)]
    pub finalized: bool,
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DutiesResponse<T> {
    pub dependent_root: B256,
    #[serde(default)]
    pub execution_optimistic: bool,
    pub data: Vec<T>,
}
