use questline_store::SyncStatus;
use questline_sync::{ChangeListener, CollectionOwner, SyncConfig, SyncCoordinator, UserDirectory};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn test_config(server: &MockServer) -> SyncConfig {
    SyncConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        reconnect_min_secs: 1,
        reconnect_max_secs: 2,
        ..Default::default()
    }
}

fn coordinator(server: &MockServer) -> Arc<SyncCoordinator> {
    let directory = Arc::new(UserDirectory::new());
    Arc::new(SyncCoordinator::new(
        test_config(server),
        directory as Arc<dyn CollectionOwner>,
    ))
}

async fn wait_until<F>(deadline: Duration, mut done: F)
where
    F: AsyncFnMut() -> bool,
{
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached within {deadline:?}");
}

#[tokio::test]
async fn push_signal_triggers_a_pull() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": {"quests": [{"id": "q1", "title": "Sweep"}]},
            "newSyncTimestamp": "T1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chatEnabled": false})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string("data: changed\n\n"),
        )
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    let mut listener = ChangeListener::spawn(test_config(&server), Arc::clone(&coordinator));

    let store = coordinator.store();
    wait_until(Duration::from_secs(3), async || store.read().await.loaded).await;

    assert_eq!(store.read().await.status, SyncStatus::Success);
    assert_eq!(coordinator.cursor().await.unwrap().as_str(), "T1");

    listener.stop();
}

#[tokio::test]
async fn keepalive_comments_do_not_trigger_pulls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(": keepalive\n\n: keepalive\n\n"),
        )
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    let mut listener = ChangeListener::spawn(test_config(&server), Arc::clone(&coordinator));

    tokio::time::sleep(Duration::from_millis(300)).await;
    listener.stop();

    let pulls = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/sync")
        .count();
    assert_eq!(pulls, 0);
}

#[tokio::test]
async fn failed_connection_is_not_fatal() {
    let server = MockServer::start().await;
    // No events mock mounted: the connect gets a 404 every time.
    Mock::given(method("GET"))
        .and(path("/api/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": {},
            "newSyncTimestamp": "T1"
        })))
        .mount(&server)
        .await;

    let coordinator = coordinator(&server);
    let mut listener = ChangeListener::spawn(test_config(&server), Arc::clone(&coordinator));

    tokio::time::sleep(Duration::from_millis(200)).await;
    // The listener is still alive and the engine still works.
    coordinator.sync().await.unwrap();
    assert_eq!(coordinator.cursor().await.unwrap().as_str(), "T1");

    listener.stop();
}
