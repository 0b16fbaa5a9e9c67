use std::time::Duration;

use hyperdrive_api_types_beacon::error::BeaconError;
use reqwest::Url;
use tracing::info;

use crate::{beacon_api_client::BeaconApiClient, failover::FailoverManager, query::QueryConfig};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconClientConfig {
    pub primary_url: Url,
    pub fallback_url: Option<Url>,
    pub request_timeout: Duration,
    pub ignore_sync_check: bool,
    pub query: QueryConfig,
}

impl BeaconClientConfig {
    pub fn new(primary_url: Url) -> Self {
        Self {
            primary_url,
            fallback_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            ignore_sync_check: false,
            query: QueryConfig::default(),
        }
    }

    pub fn with_fallback(mut self, fallback_url: Url) -> Self {
        self.fallback_url = Some(fallback_url);
        self
    }

    pub fn validate(&self) -> Result<(), BeaconError> {
        self.query.validate()?;
        if self.request_timeout.is_zero() {
            return Err(BeaconError::InvalidInput(
                "request timeout must be non-zero".to_string(),
            ));
        }
        if self.fallback_url.as_ref() == Some(&self.primary_url) {
            return Err(BeaconError::InvalidInput(format!(
                "fallback beacon node {} is the same as the primary",
                self.primary_url
            )));
        }
        Ok(())
    }

    pub fn build_failover_manager(&self) -> anyhow::Result<FailoverManager<BeaconApiClient>> {
        self.validate()?;

        let primary =
            BeaconApiClient::new(self.primary_url.clone(), self.request_timeout, self.query)?;
        let fallback = self
            .fallback_url
            .as_ref()
            .map(|url| BeaconApiClient::new(url.clone(), self.request_timeout, self.query))
            .transpose()?;

        info!(
            "Using primary beacon node {} with {}",
            self.primary_url,
            match &self.fallback_url {
                Some(url) => format!("fallback {url}"),
                None => "no fallback".to_string(),
            }
        );

        Ok(FailoverManager::new(primary, fallback, self.ignore_sync_check))
    }
}
