use clap::Parser;
use hyperdrive::cli::{
    BeaconClientArgs, Cli, Commands,
    status::{StatusConfig, health_report, head_report},
    validators::{ValidatorsConfig, record_line},
};
use hyperdrive_beacon_client::{BeaconApiClient, BeaconNode, FailoverManager};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbosity when set.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.verbosity.directive()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, cancelling outstanding requests");
            shutdown.cancel();
        }
    });

    let result = match cli.command {
        Commands::Status(config) => run_status(config, &cancel).await,
        Commands::Validators(config) => run_validators(config, &cancel).await,
    };
    if let Err(err) = &result {
        error!("{err:#}");
    }
    result
}

fn connect(args: &BeaconClientArgs) -> anyhow::Result<FailoverManager<BeaconApiClient>> {
    args.client_config().build_failover_manager()
}

async fn run_status(config: StatusConfig, cancel: &CancellationToken) -> anyhow::Result<()> {
    let manager = connect(&config.beacon)?;

    let status = manager.check_status(cancel).await?;
    println!("{}", health_report(&status));

    // A syncing or unreachable node has no usable head; its health line above says why.
    match manager.beacon_head(cancel).await {
        Ok(head) => println!("{}", head_report(&head)),
        Err(err) => warn!("Chain head unavailable: {err}"),
    }

    Ok(())
}

async fn run_validators(config: ValidatorsConfig, cancel: &CancellationToken) -> anyhow::Result<()> {
    let manager = connect(&config.beacon)?;
    let state = config.state_selector();

    let statuses = manager
        .validator_statuses(&config.pubkeys, state, cancel)
        .await?;
    info!("Fetched {} validator records at {state:?}", statuses.len());

    for pubkey in &config.pubkeys {
        println!("{}", record_line(pubkey, statuses.get(pubkey)));
    }

    Ok(())
}
