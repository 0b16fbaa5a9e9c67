use std::{sync::Arc, time::Duration};

use beacon_client_tests::{
    Method, MockBeaconTransport, active_validator, generate_pubkeys, mock_client,
    sync_status_body, validators_route,
};
use hyperdrive_api_types_beacon::{
    error::{BeaconError, TransportErrorKind},
    id::StateSelector,
};
use hyperdrive_beacon_client::{BeaconApiClient, BeaconNode, FailoverManager};
use reqwest::StatusCode;
use rstest::rstest;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

const SYNC_STATUS: &str = "/eth/v1/node/syncing";

type MockManager = FailoverManager<BeaconApiClient<MockBeaconTransport>>;

fn manager(primary: MockBeaconTransport, fallback: MockBeaconTransport) -> MockManager {
    FailoverManager::new(mock_client(primary), Some(mock_client(fallback)), false)
}

fn synced() -> MockBeaconTransport {
    MockBeaconTransport::default().respond(
        Method::Get,
        SYNC_STATUS,
        StatusCode::OK,
        &sync_status_body(9_000_000, 0, false),
    )
}

fn primary_calls(manager: &MockManager) -> usize {
    manager.primary().transport().requests().len()
}

fn fallback_calls(manager: &MockManager) -> usize {
    manager
        .fallback()
        .map(|fallback| fallback.transport().requests().len())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_sync_progress_through_manager() -> anyhow::Result<()> {
    let primary = MockBeaconTransport::default().respond(
        Method::Get,
        SYNC_STATUS,
        StatusCode::OK,
        &sync_status_body(100, 25, true),
    );
    let manager = FailoverManager::new(mock_client(primary), None, false);

    let status = manager.sync_status(&CancellationToken::new()).await?;
    assert!(status.is_syncing);
    assert!((status.progress() - 0.8).abs() < f64::EPSILON);

    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_failover_on_transport_error() -> anyhow::Result<()> {
    let primary = MockBeaconTransport::default().fail(Method::Get, SYNC_STATUS, TransportErrorKind::Connect);
    let manager = manager(primary, synced());
    let cancel = CancellationToken::new();

    let status = manager.sync_status(&cancel).await?;
    assert!(!status.is_syncing);
    assert_eq!(primary_calls(&manager), 1);
    assert_eq!(fallback_calls(&manager), 1);

    let health = manager.health();
    assert!(!health.primary.is_ready());
    assert!(health.primary.last_error.is_some());
    assert!(logs_contain("Primary beacon node unavailable"));

    manager.sync_status(&cancel).await?;
    assert_eq!(primary_calls(&manager), 1);
    assert_eq!(fallback_calls(&manager), 2);

    Ok(())
}

#[rstest]
#[case(StatusCode::INTERNAL_SERVER_ERROR, "internal")]
#[case(StatusCode::OK, "not json")]
#[tokio::test]
async fn test_no_failover_on_semantic_error(
    #[case] status: StatusCode,
    #[case] body: &str,
) -> anyhow::Result<()> {
    let primary = MockBeaconTransport::default().respond(Method::Get, SYNC_STATUS, status, body);
    let manager = manager(primary, synced());

    let err = manager
        .sync_status(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(!err.is_disconnection());
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        assert!(matches!(
            &err,
            BeaconError::HttpStatus { status_code, body, .. }
                if *status_code == StatusCode::INTERNAL_SERVER_ERROR && body == "internal"
        ));
    } else {
        assert!(matches!(err, BeaconError::Decode { .. }));
    }
    assert_eq!(fallback_calls(&manager), 0);
    assert!(manager.health().primary.is_ready());

    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_all_clients_down() -> anyhow::Result<()> {
    let primary = MockBeaconTransport::default().fail(Method::Get, SYNC_STATUS, TransportErrorKind::Connect);
    let fallback = MockBeaconTransport::default().fail(Method::Get, SYNC_STATUS, TransportErrorKind::Timeout);
    let manager = manager(primary, fallback);
    let cancel = CancellationToken::new();

    let err = manager.sync_status(&cancel).await.unwrap_err();
    assert!(matches!(err, BeaconError::NoClientsReady));
    assert!(logs_contain("All beacon clients failed"));

    let health = manager.health();
    assert!(!health.primary.is_ready());
    assert!(!health.fallback.is_some_and(|health| health.is_ready()));

    let err = manager.sync_status(&cancel).await.unwrap_err();
    assert!(matches!(err, BeaconError::NoClientsReady));
    assert_eq!(primary_calls(&manager), 1);
    assert_eq!(fallback_calls(&manager), 1);

    Ok(())
}

#[tokio::test]
async fn test_no_fallback_configured() -> anyhow::Result<()> {
    let primary = MockBeaconTransport::default().fail(Method::Get, SYNC_STATUS, TransportErrorKind::Io);
    let manager = FailoverManager::new(mock_client(primary), None, false);

    let err = manager
        .sync_status(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BeaconError::NoClientsReady));
    assert!(manager.health().fallback.is_none());

    Ok(())
}

#[tokio::test]
async fn test_cancellation_does_not_demote() -> anyhow::Result<()> {
    let primary = synced().with_delay(Duration::from_secs(5));
    let manager = manager(primary, synced());
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = manager.sync_status(&cancel).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(manager.health().primary.is_ready());
    assert_eq!(fallback_calls(&manager), 0);

    Ok(())
}

#[tokio::test]
async fn test_validator_windows_fail_over() -> anyhow::Result<()> {
    let pubkeys = generate_pubkeys(3);
    let primary = MockBeaconTransport::default().fail(
        Method::Get,
        "/eth/v1/beacon/states/head/validators",
        TransportErrorKind::Connect,
    );
    let fallback = MockBeaconTransport::default().route(
        Method::Get,
        "/eth/v1/beacon/states/head/validators",
        validators_route(vec![active_validator(11, pubkeys[0].clone())]),
    );
    let manager = manager(primary, fallback);

    let statuses = manager
        .validator_statuses(&pubkeys, StateSelector::Head, &CancellationToken::new())
        .await?;
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses[&pubkeys[0]].index, "11");
    assert!(!statuses[&pubkeys[1]].exists);

    Ok(())
}

#[tokio::test]
async fn test_validator_lookup_runs_on_spawned_task() -> anyhow::Result<()> {
    let pubkeys = generate_pubkeys(5);
    let validators = pubkeys
        .iter()
        .enumerate()
        .map(|(index, pubkey)| active_validator(index as u64, pubkey.clone()))
        .collect();
    let primary = MockBeaconTransport::default().route(
        Method::Get,
        "/eth/v1/beacon/states/head/validators",
        validators_route(validators),
    );
    let manager = Arc::new(FailoverManager::new(mock_client(primary), None, false));

    let task = tokio::spawn({
        let manager = manager.clone();
        let pubkeys = pubkeys.clone();
        async move {
            manager
                .validator_statuses(&pubkeys, StateSelector::Head, &CancellationToken::new())
                .await
        }
    });
    let statuses = task.await??;

    assert_eq!(statuses.len(), 5);
    assert!(statuses.values().all(|record| record.exists));
    assert_eq!(primary_calls(&manager), 1);

    Ok(())
}

#[tokio::test]
#[traced_test]
async fn test_status_probe() -> anyhow::Result<()> {
    let primary = MockBeaconTransport::default().respond(
        Method::Get,
        SYNC_STATUS,
        StatusCode::OK,
        &sync_status_body(100, 25, true),
    );
    let manager = manager(primary, synced());

    let status = manager.check_status(&CancellationToken::new()).await?;
    assert!(status.primary.working);
    assert!(!status.primary.synced);
    assert!((status.primary.sync_progress - 0.8).abs() < f64::EPSILON);
    assert!(status.fallback.is_some_and(|health| health.is_ready()));
    assert!(logs_contain("The primary beacon node is still syncing"));

    manager.sync_status(&CancellationToken::new()).await?;
    assert_eq!(primary_calls(&manager), 1);
    assert_eq!(fallback_calls(&manager), 2);

    Ok(())
}

#[tokio::test]
async fn test_status_probe_marks_unreachable_client() -> anyhow::Result<()> {
    let fallback = MockBeaconTransport::default().fail(Method::Get, SYNC_STATUS, TransportErrorKind::Connect);
    let manager = manager(synced(), fallback);

    let status = manager.check_status(&CancellationToken::new()).await?;
    assert!(status.primary.is_ready());
    let fallback = status.fallback.expect("fallback is configured");
    assert!(!fallback.working);
    assert!(fallback.last_error.is_some());

    Ok(())
}

#[tokio::test]
async fn test_ignore_sync_check_skips_probe() -> anyhow::Result<()> {
    let manager = FailoverManager::new(
        mock_client(MockBeaconTransport::default()),
        Some(mock_client(MockBeaconTransport::default())),
        true,
    );

    let status = manager.check_status(&CancellationToken::new()).await?;
    assert!(status.primary.is_ready());
    assert!(status.fallback.is_some_and(|health| health.is_ready()));
    assert_eq!(primary_calls(&manager), 0);
    assert_eq!(fallback_calls(&manager), 0);

    Ok(())
}
