use blst::min_pk::PublicKey as BlstPublicKey;

use crate::{errors::BLSError, pubkey::PubKey};

impl PubKey {
    pub fn to_blst_pubkey(&self) -> Result<BlstPublicKey, BLSError> {
        BlstPublicKey::key_validate(self.to_bytes())
            .map_err(|err| BLSError::BlstError(format!("{err:?}")))
    }

    /// Whether the bytes decompress to a G1 point in the correct subgroup that is not the
    /// point at infinity.
    pub fn is_valid(&self) -> bool {
        self.to_blst_pubkey().is_ok()
    }
}

impl TryFrom<BlstPublicKey> for PubKey {
    type Error = BLSError;

    fn try_from(value: BlstPublicKey) -> Result<Self, Self::Error> {
        PubKey::from_bytes(&value.to_bytes()).map_err(|_| BLSError::InvalidPublicKey)
    }
}
