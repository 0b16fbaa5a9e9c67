use std::str::FromStr;

use alloy_primitives::{Address, aliases::B32};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, parse_quoted_u64};

/// The subset of `/eth/v1/config/spec` the core relies on, exactly as the node sends it.
///
/// Every value in that response is a string, so the fields are kept raw here and parsed in
/// [BeaconConfig::try_from] where a bad value can be reported with its field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ConfigSpec {
    pub seconds_per_slot: String,
    pub slots_per_epoch: String,
    pub epochs_per_sync_committee_period: String,
    pub capella_fork_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_per_epoch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconConfig {
    pub seconds_per_slot: u64,
    pub slots_per_epoch: u64,
    pub seconds_per_epoch: u64,
    pub epochs_per_sync_committee_period: u64,
    pub capella_fork_version: B32,
}

impl TryFrom<ConfigSpec> for BeaconConfig {
    type Error = FieldError;

    fn try_from(spec: ConfigSpec) -> Result<Self, Self::Error> {
        let seconds_per_slot = parse_quoted_u64("data.SECONDS_PER_SLOT", &spec.seconds_per_slot)?;
        let slots_per_epoch = parse_quoted_u64("data.SLOTS_PER_EPOCH", &spec.slots_per_epoch)?;
        if slots_per_epoch == 0 {
            return Err(FieldError::new("data.SLOTS_PER_EPOCH", "must be non-zero"));
        }
        let epochs_per_sync_committee_period = parse_quoted_u64(
            "data.EPOCHS_PER_SYNC_COMMITTEE_PERIOD",
            &spec.epochs_per_sync_committee_period,
        )?;
        let capella_fork_version = B32::from_str(&spec.capella_fork_version).map_err(|err| {
            FieldError::new(
                "data.CAPELLA_FORK_VERSION",
                format!("invalid fork version {:?}: {err}", spec.capella_fork_version),
            )
        })?;

        let seconds_per_epoch = seconds_per_slot
            .checked_mul(slots_per_epoch)
            .ok_or_else(|| FieldError::new("data.SECONDS_PER_EPOCH", "overflows u64"))?;
        if let Some(reported) = &spec.seconds_per_epoch {
            let reported = parse_quoted_u64("data.SECONDS_PER_EPOCH", reported)?;
            if reported != seconds_per_epoch {
                return Err(FieldError::new(
                    "data.SECONDS_PER_EPOCH",
                    format!(
                        "node reports {reported} but SECONDS_PER_SLOT * SLOTS_PER_EPOCH is {seconds_per_epoch}"
                    ),
                ));
            }
        }

        Ok(Self {
            seconds_per_slot,
            slots_per_epoch,
            seconds_per_epoch,
            epochs_per_sync_committee_period,
            capella_fork_version,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositContract {
    #[serde(with = "serde_utils::quoted_u64")]
    pub chain_id: u64,
    pub address: Address,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::fixed_bytes;

    use super::*;

    fn mainnet_spec() -> ConfigSpec {
        ConfigSpec {
            seconds_per_slot: "12".to_string(),
            slots_per_epoch: "32".to_string(),
            epochs_per_sync_committee_period: "256".to_string(),
            capella_fork_version: "0x03000000".to_string(),
            seconds_per_epoch: None,
        }
    }

    #[test]
    fn test_seconds_per_epoch_is_derived() {
        let config = BeaconConfig::try_from(mainnet_spec()).unwrap();
        assert_eq!(config.seconds_per_epoch, 384);
        assert_eq!(
            config.seconds_per_epoch,
            config.seconds_per_slot * config.slots_per_epoch
        );
        assert_eq!(config.capella_fork_version, fixed_bytes!("0x03000000"));
    }

    #[test]
    fn test_mismatched_seconds_per_epoch_is_rejected() {
        let spec = ConfigSpec {
            seconds_per_epoch: Some("400".to_string()),
            ..mainnet_spec()
        };
        let err = BeaconConfig::try_from(spec).unwrap_err();
        assert_eq!(err.field, "data.SECONDS_PER_EPOCH");

        let spec = ConfigSpec {
            seconds_per_epoch: Some("384".to_string()),
            ..mainnet_spec()
        };
        assert!(BeaconConfig::try_from(spec).is_ok());
    }

    #[test]
    fn test_bad_numeric_field_is_named() {
        let spec = ConfigSpec {
            slots_per_epoch: "thirty-two".to_string(),
            ..mainnet_spec()
        };
        assert_eq!(
            BeaconConfig::try_from(spec).unwrap_err().field,
            "data.SLOTS_PER_EPOCH"
        );
    }

    #[test]
    fn test_config_spec_ignores_unknown_keys() {
        let spec: ConfigSpec = serde_json::from_str(
            r#"{"PRESET_BASE":"mainnet","SECONDS_PER_SLOT":"12","SLOTS_PER_EPOCH":"32",
                "EPOCHS_PER_SYNC_COMMITTEE_PERIOD":"256","CAPELLA_FORK_VERSION":"0x03000000"}"#,
        )
        .unwrap();
        assert_eq!(spec.seconds_per_slot, "12");
        assert!(spec.seconds_per_epoch.is_none());
    }
}
