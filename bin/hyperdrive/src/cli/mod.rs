pub mod constants;
pub mod status;
pub mod validators;
pub mod verbosity;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use hyperdrive_beacon_client::{CONCURRENCY, MAX_BATCH, QueryConfig, config::BeaconClientConfig};
use url::Url;

use crate::cli::{
    constants::{DEFAULT_BEACON_API_ENDPOINT, DEFAULT_REQUEST_TIMEOUT},
    status::StatusConfig,
    validators::ValidatorsConfig,
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, short, global = true, help = "Verbosity level (1=error, 2=warn, 3=info, 4=debug, 5=trace)", default_value = "3", value_parser = verbosity_parser)]
    pub verbosity: Verbosity,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe the configured beacon nodes and print chain head information
    #[command(name = "status")]
    Status(StatusConfig),

    /// Look up validator records by public key
    #[command(name = "validators")]
    Validators(ValidatorsConfig),
}

/// Connection settings shared by every subcommand.
#[derive(Debug, Args)]
pub struct BeaconClientArgs {
    #[arg(long, env = "HYPERDRIVE_PRIMARY_URL", help = "Set HTTP url of the primary beacon api endpoint", default_value = DEFAULT_BEACON_API_ENDPOINT)]
    pub primary_url: Url,

    #[arg(long, env = "HYPERDRIVE_FALLBACK_URL", help = "Set HTTP url of a fallback beacon api endpoint")]
    pub fallback_url: Option<Url>,

    #[arg(long, help = "Set HTTP request timeout for beacon api calls in seconds", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = duration_parser)]
    pub request_timeout: Duration,

    #[arg(long, help = "Treat every beacon node as ready without probing its sync status")]
    pub ignore_sync_check: bool,

    #[arg(long, help = "Maximum validator identifiers per request", default_value_t = MAX_BATCH)]
    pub batch_size: usize,

    #[arg(long, help = "Maximum validator requests in flight", default_value_t = CONCURRENCY)]
    pub concurrency: usize,
}

impl BeaconClientArgs {
    pub fn client_config(&self) -> BeaconClientConfig {
        BeaconClientConfig {
            primary_url: self.primary_url.clone(),
            fallback_url: self.fallback_url.clone(),
            request_timeout: self.request_timeout,
            ignore_sync_check: self.ignore_sync_check,
            query: QueryConfig {
                batch_size: self.batch_size,
                concurrency: self.concurrency,
            },
        }
    }
}

pub fn duration_parser(duration_string: &str) -> Result<Duration, String> {
    Ok(Duration::from_secs(duration_string.parse().map_err(
        |err| format!("Could not parse the request timeout: {err:?}"),
    )?))
}
