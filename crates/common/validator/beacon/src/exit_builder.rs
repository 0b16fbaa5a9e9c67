use alloy_primitives::Address;
use hyperdrive_api_types_beacon::error::BeaconError;
use hyperdrive_beacon_client::BeaconNode;
use hyperdrive_bls::PubKey;
use hyperdrive_consensus::{
    bls_to_execution_change::SignedBLSToExecutionChange,
    constants::{DOMAIN_BLS_TO_EXECUTION_CHANGE, DOMAIN_VOLUNTARY_EXIT},
    voluntary_exit::SignedVoluntaryExit,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    bls_to_execution_change::{bls_to_execution_change_signing_root, sign_bls_to_execution_change},
    domain::{ForkSelector, get_domain_data},
    signer::WalletSigner,
    voluntary_exit::{parse_validator_index, sign_voluntary_exit, voluntary_exit_signing_root},
};

const GENESIS_EPOCH: u64 = 0;

/// Builds signed exits and withdrawal credential changes and hands them to a beacon node.
pub struct ExitBuilder<'a, N: ?Sized, S: ?Sized> {
    node: &'a N,
    signer: &'a S,
}

impl<'a, N, S> ExitBuilder<'a, N, S>
where
    N: BeaconNode + ?Sized,
    S: WalletSigner + ?Sized,
{
    pub fn new(node: &'a N, signer: &'a S) -> Self {
        Self { node, signer }
    }

    /// Signs an exit for the validator with `pubkey` and decimal index `validator_index`.
    ///
    /// A malformed index is rejected before anything is fetched from the node.
    pub async fn build_voluntary_exit(
        &self,
        pubkey: &PubKey,
        validator_index: &str,
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<SignedVoluntaryExit, BeaconError> {
        let validator_index = parse_validator_index(validator_index)?;
        let domain = get_domain_data(
            self.node,
            DOMAIN_VOLUNTARY_EXIT,
            epoch,
            ForkSelector::Capella,
            cancel,
        )
        .await?;

        let (voluntary_exit, signing_root) =
            voluntary_exit_signing_root(validator_index, epoch, domain);
        let signature = self
            .signer
            .sign(pubkey, signing_root)
            .await
            .map_err(|err| BeaconError::Signer(format!("{err:#}")))?;

        Ok(sign_voluntary_exit(voluntary_exit, signature))
    }

    pub async fn submit_voluntary_exit(
        &self,
        pubkey: &PubKey,
        validator_index: &str,
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        let exit = self
            .build_voluntary_exit(pubkey, validator_index, epoch, cancel)
            .await?;
        info!("Submitting voluntary exit for validator {validator_index} at epoch {epoch}");
        self.node.submit_voluntary_exit(&exit, cancel).await
    }

    /// Signs a change of withdrawal credentials to `to_execution_address` with the withdrawal
    /// key `from_bls_pubkey`.
    pub async fn build_bls_to_execution_change(
        &self,
        validator_index: &str,
        from_bls_pubkey: &PubKey,
        to_execution_address: Address,
        cancel: &CancellationToken,
    ) -> Result<SignedBLSToExecutionChange, BeaconError> {
        let validator_index = parse_validator_index(validator_index)?;
        let domain = get_domain_data(
            self.node,
            DOMAIN_BLS_TO_EXECUTION_CHANGE,
            GENESIS_EPOCH,
            ForkSelector::Genesis,
            cancel,
        )
        .await?;

        let (change, signing_root) = bls_to_execution_change_signing_root(
            validator_index,
            from_bls_pubkey.clone(),
            to_execution_address,
            domain,
        );
        let signature = self
            .signer
            .sign(from_bls_pubkey, signing_root)
            .await
            .map_err(|err| BeaconError::Signer(format!("{err:#}")))?;

        Ok(sign_bls_to_execution_change(change, signature))
    }

    pub async fn submit_bls_to_execution_change(
        &self,
        validator_index: &str,
        from_bls_pubkey: &PubKey,
        to_execution_address: Address,
        cancel: &CancellationToken,
    ) -> Result<bool, BeaconError> {
        let change = self
            .build_bls_to_execution_change(
                validator_index,
                from_bls_pubkey,
                to_execution_address,
                cancel,
            )
            .await?;
        info!(
            "Submitting BLS to execution change for validator {validator_index} to {to_execution_address}"
        );
        self.node
            .submit_bls_to_execution_change(&change, cancel)
            .await
    }
}
