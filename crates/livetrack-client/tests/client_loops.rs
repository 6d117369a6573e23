//! End-to-end tests for the client loops against a served registry.
//!
//! Each test binds the registry router to an ephemeral localhost port and
//! drives it through the real HTTP client, so the wire contract is
//! exercised exactly as a deployed reporter or dashboard would.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use livetrack_client::{
    AgentConfig, ClientError, Observer, ObserverConfig, PositionError, PositionFix,
    PositionSource, RegistryClient, ReportingAgent, SimulatedRoute,
};
use livetrack_registry::{create_router, AppState, LocationRegistry, RegistryConfig};

async fn serve_registry() -> (String, LocationRegistry, JoinHandle<()>) {
    let registry = LocationRegistry::new(RegistryConfig::default());
    let app = create_router(AppState::new(registry.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), registry, server)
}

#[tokio::test]
async fn test_report_and_list_round_trip() {
    let (url, _registry, _server) = serve_registry().await;
    let client = RegistryClient::new(&url).unwrap();

    let stored = client.report("courier-1", 52.1, 21.2, true).await.unwrap();
    assert_eq!(stored.latitude, 52.1);
    assert_eq!(stored.longitude, 21.2);
    assert!(stored.is_tracking);

    let active = client.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].tracker_id, "courier-1");
    assert_eq!(active[0].last_updated_at, stored.last_updated_at);
}

#[tokio::test]
async fn test_rejected_report_carries_server_message() {
    let (url, registry, _server) = serve_registry().await;
    let client = RegistryClient::new(&url).unwrap();

    let err = client.report("", 0.0, 0.0, true).await.unwrap_err();
    match err {
        ClientError::Rejected { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert!(!message.is_empty());
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_agent_reports_then_stops_on_shutdown() {
    let (url, registry, _server) = serve_registry().await;
    let client = RegistryClient::new(&url).unwrap();
    let source = SimulatedRoute::new(50.06, 19.94, Duration::from_millis(10));
    let mut agent = ReportingAgent::new(client, "courier-2", source);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = tokio::spawn(async move { agent.run(shutdown_rx).await });

    // Let a few fixes flow
    tokio::time::sleep(Duration::from_millis(150)).await;
    let snapshot = registry.get("courier-2").expect("agent should have reported");
    assert!(snapshot.is_tracking);

    shutdown_tx.send(true).unwrap();
    session.await.unwrap().unwrap();

    // The teardown report cleared the flag; the record lingers until swept
    let snapshot = registry.get("courier-2").unwrap();
    assert!(!snapshot.is_tracking);
    assert!(registry.list_active().is_empty());
}

struct StalledSource;

#[async_trait::async_trait]
impl PositionSource for StalledSource {
    async fn next_fix(&mut self) -> Result<PositionFix, PositionError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn test_agent_deactivates_on_acquisition_timeout() {
    let (url, registry, _server) = serve_registry().await;
    let client = RegistryClient::new(&url).unwrap();

    let config = AgentConfig {
        acquire_timeout: Duration::from_millis(50),
    };
    let mut agent = ReportingAgent::with_config(client, "courier-3", StalledSource, config);

    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let err = agent.run(shutdown_rx).await.unwrap_err();
    assert!(matches!(err, PositionError::Timeout { .. }));

    // Best-effort stop report still went out
    let snapshot = registry.get("courier-3").unwrap();
    assert!(!snapshot.is_tracking);
}

#[tokio::test]
async fn test_observer_polls_immediately_on_activation() {
    let (url, registry, _server) = serve_registry().await;
    registry.report("courier-4", 1.0, 2.0, true).unwrap();

    // A long cadence so only the immediate first poll can have fired
    let observer = Observer::new(
        RegistryClient::new(&url).unwrap(),
        ObserverConfig {
            poll_interval: Duration::from_secs(60),
        },
    );
    let handle = observer.handle();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move { observer.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(handle.active_trackers().len(), 1);
    assert!(handle.last_error().is_none());
    assert!(handle.last_refreshed().is_some());

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_observer_keeps_last_good_snapshot_across_failures() {
    let (url, registry, server) = serve_registry().await;
    registry.report("courier-5", 3.0, 4.0, true).unwrap();

    let observer = Observer::new(RegistryClient::new(&url).unwrap(), ObserverConfig::default());
    let handle = observer.handle();

    observer.poll_once().await;
    assert_eq!(handle.active_trackers().len(), 1);
    assert!(handle.last_error().is_none());

    // Take the registry away; the next poll fails
    server.abort();
    let _ = server.await;
    observer.poll_once().await;

    // Previous snapshot stays on display, flagged as stale
    assert_eq!(handle.active_trackers().len(), 1);
    assert_eq!(handle.active_trackers()[0].tracker_id, "courier-5");
    assert!(handle.last_error().is_some());
}
