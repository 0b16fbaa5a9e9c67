use alloy_primitives::B256;
use async_trait::async_trait;
use hyperdrive_bls::{BLSSignature, PubKey};

/// Holds the validator keys and signs on their behalf.
///
/// Keys never leave the signer: it is handed the public key of the validator and the
/// 32-byte signing root, and returns the 96-byte signature.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    async fn sign(&self, pubkey: &PubKey, signing_root: B256) -> anyhow::Result<BLSSignature>;
}
