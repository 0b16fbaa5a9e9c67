use std::{collections::HashMap, fmt, future::Future};

use async_trait::async_trait;
use hyperdrive_api_types_beacon::{
    attestation::AttestationInfo,
    block::BeaconBlock,
    committee::Committee,
    config::{BeaconConfig, DepositContract},
    error::{BeaconError, TransportError},
    finality::FinalityCheckpoints,
    id::{ID, ValidatorID},
    sync::SyncStatus,
    validator::ValidatorData,
};
use hyperdrive_consensus::{
    bls_to_execution_change::SignedBLSToExecutionChange, fork::Fork, genesis::Genesis,
    voluntary_exit::SignedVoluntaryExit,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{node::BeaconNode, query::QueryConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    Primary,
    Fallback,
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientRole::Primary => write!(f, "primary"),
            ClientRole::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientHealth {
    pub working: bool,
    pub synced: bool,
    pub sync_progress: f64,
    pub last_error: Option<String>,
}

impl Default for ClientHealth {
    fn default() -> Self {
        Self {
            working: true,
            synced: true,
            sync_progress: 1.0,
            last_error: None,
        }
    }
}

impl ClientHealth {
    /// Only a working, synced client is dispatched to.
    pub fn is_ready(&self) -> bool {
        self.working && self.synced
    }

    fn demote(&mut self, err: &BeaconError) {
        self.working = false;
        self.last_error = Some(err.to_string());
    }

    fn record_probe(&mut self, result: &Result<SyncStatus, BeaconError>) {
        match result {
            Ok(status) => {
                self.working = true;
                self.synced = !status.is_syncing;
                self.sync_progress = status.progress();
                self.last_error = None;
            }
            Err(err) => {
                self.working = false;
                self.synced = false;
                self.last_error = Some(err.to_string());
            }
        }
    }
}

impl fmt::Display for ClientHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.working {
            return write!(
                f,
                "not working ({})",
                self.last_error.as_deref().unwrap_or("unknown error")
            );
        }
        if !self.synced {
            return write!(f, "syncing ({:.2}%)", self.sync_progress * 100.0);
        }
        write!(f, "synced")
    }
}

/// Snapshot of both clients' health.
#[derive(Debug, Clone, PartialEq)]
pub struct FailoverStatus {
    pub primary: ClientHealth,
    pub fallback: Option<ClientHealth>,
}

/// Serves every [BeaconNode] operation from a primary node, moving to the fallback when the
/// primary becomes unreachable.
///
/// Only disconnections move traffic. An HTTP error, a bad response or a cancellation from the
/// primary is returned to the caller as is. A demoted client stays demoted until
/// [FailoverManager::check_status] finds it working and synced again, or the manager is
/// rebuilt.
pub struct FailoverManager<N> {
    primary: N,
    fallback: Option<N>,
    ignore_sync_check: bool,
    health: Mutex<FailoverStatus>,
}

impl<N: BeaconNode> FailoverManager<N> {
    pub fn new(primary: N, fallback: Option<N>, ignore_sync_check: bool) -> Self {
        let health = FailoverStatus {
            primary: ClientHealth::default(),
            fallback: fallback.as_ref().map(|_| ClientHealth::default()),
        };
        Self {
            primary,
            fallback,
            ignore_sync_check,
            health: Mutex::new(health),
        }
    }

    pub fn primary(&self) -> &N {
        &self.primary
    }

    pub fn fallback(&self) -> Option<&N> {
        self.fallback.as_ref()
    }

    pub fn health(&self) -> FailoverStatus {
        self.health.lock().clone()
    }

    /// Probes each client with a sync status request and records the outcome.
    ///
    /// With `ignore_sync_check` set nothing is sent and the stored health is returned. A
    /// cancelled probe leaves the stored health untouched.
    pub async fn check_status(
        &self,
        cancel: &CancellationToken,
    ) -> Result<FailoverStatus, BeaconError> {
        if self.ignore_sync_check {
            return Ok(self.health());
        }

        let fallback_probe = async {
            match &self.fallback {
                Some(fallback) => Some(fallback.sync_status(cancel).await),
                None => None,
            }
        };
        let (primary, fallback) =
            futures::join!(self.primary.sync_status(cancel), fallback_probe);

        if cancel.is_cancelled() {
            return Err(TransportError::cancelled().into());
        }

        let mut health = self.health.lock();
        health.primary.record_probe(&primary);
        log_probe(ClientRole::Primary, &health.primary);
        if let (Some(stored), Some(result)) = (health.fallback.as_mut(), fallback.as_ref()) {
            stored.record_probe(result);
            log_probe(ClientRole::Fallback, stored);
        }

        Ok(health.clone())
    }

    /// Runs `operation` on the first ready client.
    async fn dispatch<'a, F, Fut, R>(&'a self, name: &str, operation: F) -> Result<R, BeaconError>
    where
        F: Fn(&'a N) -> Fut,
        Fut: Future<Output = Result<R, BeaconError>>,
    {
        if self.health.lock().primary.is_ready() {
            match operation(&self.primary).await {
                Err(err) if err.is_disconnection() => {
                    warn!("Primary beacon node unavailable during {name}, using fallback: {err}");
                    self.health.lock().primary.demote(&err);
                }
                result => return result,
            }
        }

        let Some(fallback) = &self.fallback else {
            return Err(BeaconError::NoClientsReady);
        };
        let fallback_ready = self
            .health
            .lock()
            .fallback
            .as_ref()
            .is_some_and(ClientHealth::is_ready);
        if !fallback_ready {
            return Err(BeaconError::NoClientsReady);
        }

        match operation(fallback).await {
            Err(err) if err.is_disconnection() => {
                warn!("All beacon clients failed during {name}: {err}");
                if let Some(health) = self.health.lock().fallback.as_mut() {
                    health.demote(&err);
                }
                Err(BeaconError::NoClientsReady)
            }
            result => result,
        }
    }
}

fn log_probe(role: ClientRole, health: &ClientHealth) {
    match (&health.last_error, health.synced) {
        (Some(err), _) => warn!("The {role} beacon node is not working: {err}"),
        (None, false) => warn!(
            "The {role} beacon node is still syncing ({:.2}%)",
            health.sync_progress * 100.0
        ),
        (None, true) => info!("The {role} beacon node is synced and ready"),
    }
}

#[async_trait]
impl<N: BeaconNode> BeaconNode for FailoverManager<N> {
    fn query_config(&self) -> QueryConfig {
        self.primary.query_config()
    }

    async fn sync_status(&self, cancel: &CancellationToken) -> Result<SyncStatus, BeaconError> {
        self.dispatch("sync status", |node| node.sync_status(cancel))
            .await
    }

    async fn beacon_config(&self, cancel: &CancellationToken) -> Result<BeaconConfig, BeaconError> {
        self.dispatch("beacon config", |node| node.beacon_config(cancel))
            .await
    }

    async fn deposit_contract(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DepositContract, BeaconError> {
        self.dispatch("deposit contract", |node| node.deposit_contract(cancel))
            .await
    }

    async fn genesis(&self, cancel: &CancellationToken) -> Result<Genesis, BeaconError> {
        self.dispatch("genesis", |node| node.genesis(cancel)).await
    }

    async fn finality_checkpoints(
        &self,
        state_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<FinalityCheckpoints, BeaconError> {
        self.dispatch("finality checkpoints", |node| {
            node.finality_checkpoints(state_id, cancel)
        })
        .await
    }

    async fn fork(&self, state_id: &ID, cancel: &CancellationToken) -> Result<Fork, BeaconError> {
        self.dispatch("fork", |node| node.fork(state_id, cancel))
            .await
    }

    async fn committees(
        &self,
        state_id: &ID,
        epoch: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Committee>, BeaconError> {
        self.dispatch("committees", |node| node.committees(state_id, epoch, cancel))
            .await
    }

    async fn validators(
        &self,
        state_id: &ID,
        ids: &[ValidatorID],
        cancel: &CancellationToken,
    ) -> Result<Vec<ValidatorData>, BeaconError> {
        self.dispatch("validators", |node| node.validators(state_id, ids, cancel))
            .await
    }

    async fn attestations(
        &self,
        block_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<AttestationInfo>>, BeaconError> {
        self.dispatch("attestations", |node| node.attestations(block_id, cancel))
            .await
    }

    async fn beacon_block(
        &self,
        block_id: &ID,
        cancel: &CancellationToken,
    ) -> Result<Option<BeaconBlock>, BeaconError> {
        self.dispatch("beacon block", |node| node.beacon_block(block_id, cancel))
            .await
    }

    async fn validator_sync_duties(
        &self,
        indices: &[u64],
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<HashMap<u64, bool>, BeaconError> {
        self.dispatch("sync duties", |node| {
            node.validator_sync_duties(indices, epoch, cancel)
        })
        .await
    }

    async fn validator_proposer_duties(
        &self,
        indices: &[u64],
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<HashMap<u64, u64>, BeaconError> {
        self.dispatch("proposer duties", |node| {
            node.validator_proposer_duties(indices, epoch, cancel)
        })
        .await
    }

    async fn submit_voluntary_exit(
        &self,
        exit: &SignedVoluntaryExit,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        self.dispatch("voluntary exit", |node| {
            node.submit_voluntary_exit(exit, cancel)
        })
        .await
    }

    async fn submit_bls_to_execution_change(
        &self,
        change: &SignedBLSToExecutionChange,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        self.dispatch("bls to execution change", |node| {
            node.submit_bls_to_execution_change(change, cancel)
        })
        .await
    }
}
