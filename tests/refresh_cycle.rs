//! End-to-end session tests: initial load, add/delete round trips, and the
//! reload they trigger, against a mock backend

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bandwatch::config::Config;
use bandwatch::session::{SessionConfig, SessionEvent, SessionManager, UiCommand};

async fn mount_read_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/tracked-stocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"ticker": "SBER", "buy_price": "250.5", "sell_price": "310"},
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prices": {"SBER": 305.1},
            "last_updated": "2025-11-03T14:25:07",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/stock-history/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prices": [250.0, 251.5, 249.0],
        })))
        .mount(server)
        .await;
}

fn headless_session(server: &MockServer) -> SessionManager {
    let mut config = Config::default();
    config.backend.base_url = server.uri();
    // Keep the scheduled cadences out of the way; the test drives reloads
    config.poll.table_refresh_secs = 3600;
    config.poll.price_refresh_secs = 3600;
    SessionManager::with_session_config(config, SessionConfig { enable_tui: false }).unwrap()
}

/// Read events until one matches, with a deadline
async fn next_matching<F>(
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    mut predicate: F,
) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for session event")
}

#[tokio::test]
async fn initial_load_publishes_table_and_charts() {
    let server = MockServer::start().await;
    mount_read_endpoints(&server).await;

    let mut manager = headless_session(&server);
    let mut events = manager.take_event_receiver().unwrap();
    let commands = manager.command_sender();

    manager.initialize().await.unwrap();
    let session = tokio::spawn(async move { manager.run().await });

    let event = next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { .. })
    })
    .await;
    match event {
        SessionEvent::TableLoaded {
            generation,
            stocks,
            snapshot,
        } => {
            assert_eq!(generation, 1);
            assert_eq!(stocks.len(), 1);
            assert_eq!(stocks[0].ticker, "SBER");
            assert_eq!(stocks[0].buy_price, 250.5);
            assert_eq!(snapshot.price("SBER"), Some(305.1));
        }
        _ => unreachable!(),
    }

    let event = next_matching(&mut events, |e| {
        matches!(e, SessionEvent::HistoryLoaded { .. })
    })
    .await;
    match event {
        SessionEvent::HistoryLoaded {
            generation,
            ticker,
            prices,
        } => {
            assert_eq!(generation, 1);
            assert_eq!(ticker, "SBER");
            assert_eq!(prices, vec![250.0, 251.5, 249.0]);
        }
        _ => unreachable!(),
    }

    commands.send(UiCommand::Shutdown).unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn successful_add_triggers_a_fresh_full_fetch() {
    let server = MockServer::start().await;
    mount_read_endpoints(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/stock-alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = headless_session(&server);
    let mut events = manager.take_event_receiver().unwrap();
    let commands = manager.command_sender();

    manager.initialize().await.unwrap();
    let session = tokio::spawn(async move { manager.run().await });

    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { generation, .. } if *generation == 1)
    })
    .await;

    commands
        .send(UiCommand::AddStock {
            ticker: "GAZP".to_string(),
            buy_price: 120.5,
            sell_price: 140.0,
        })
        .unwrap();

    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::AddSucceeded { ticker } if ticker == "GAZP")
    })
    .await;

    // The accepted submission reloads the full table
    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { generation, .. } if *generation == 2)
    })
    .await;

    commands.send(UiCommand::Shutdown).unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn confirmed_delete_triggers_a_fresh_full_fetch() {
    let server = MockServer::start().await;
    mount_read_endpoints(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/stock-alerts/SBER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "SBER deleted",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = headless_session(&server);
    let mut events = manager.take_event_receiver().unwrap();
    let commands = manager.command_sender();

    manager.initialize().await.unwrap();
    let session = tokio::spawn(async move { manager.run().await });

    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { .. })
    })
    .await;

    commands
        .send(UiCommand::DeleteStock {
            ticker: "SBER".to_string(),
        })
        .unwrap();

    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::DeleteSucceeded { ticker } if ticker == "SBER")
    })
    .await;
    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { generation, .. } if *generation == 2)
    })
    .await;

    commands.send(UiCommand::Shutdown).unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn failed_delete_surfaces_a_notice_and_keeps_running() {
    let server = MockServer::start().await;
    mount_read_endpoints(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/stock-alerts/SBER"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut manager = headless_session(&server);
    let mut events = manager.take_event_receiver().unwrap();
    let commands = manager.command_sender();

    manager.initialize().await.unwrap();
    let session = tokio::spawn(async move { manager.run().await });

    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { .. })
    })
    .await;

    commands
        .send(UiCommand::DeleteStock {
            ticker: "SBER".to_string(),
        })
        .unwrap();
    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::DeleteFailed { .. })
    })
    .await;

    // The session is still responsive after the failure
    commands.send(UiCommand::Reload).unwrap();
    next_matching(&mut events, |e| {
        matches!(e, SessionEvent::TableLoaded { generation, .. } if *generation == 2)
    })
    .await;

    commands.send(UiCommand::Shutdown).unwrap();
    session.await.unwrap().unwrap();
}
