//! End-to-end pipeline tests: mock peripherals on one side, a canned HTTP
//! authority on the other, the real debounce/authz/lock/indicator stack in
//! between.
//!
//! Timings here are real (the authority is a real socket), so the config
//! uses short windows: 100ms dwell, 200ms deadline, 300ms cooldown.

use latchkey_authz::AuthzClient;
use latchkey_core::{AuthorizationOutcome, CardUid};
use latchkey_firmware::{
    AccessController, DoorConfig, IndicatorController, LockHandle, LockState, spawn_lock,
};
use latchkey_hardware::mock::{
    MockLamp, MockLampHandle, MockLink, MockLinkHandle, MockReader, MockReaderHandle, MockRelay,
    MockRelayHandle,
};
use latchkey_hardware::CardRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Spawn a canned authority; returns its base URL and a connection counter.
async fn spawn_authority(response: String, delay: Duration) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let task_hits = Arc::clone(&hits);
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            task_hits.fetch_add(1, Ordering::SeqCst);

            // Drain the request far enough to let the client finish writing
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{addr}"), hits)
}

struct Pipeline {
    controller: AccessController<MockReader, MockLink, MockLamp>,
    reader: MockReaderHandle,
    relay: MockRelayHandle,
    lamp: MockLampHandle,
    link: MockLinkHandle,
    lock: LockHandle,
}

fn pipeline(base_url: &str) -> Pipeline {
    let config = DoorConfig {
        server_url: base_url.to_string(),
        deadline_ms: 200,
        dwell_ms: 100,
        cooldown_ms: 300,
        poll_interval_ms: 10,
        ..Default::default()
    };

    let (reader, reader_handle) = MockReader::new();
    let (relay, relay_handle) = MockRelay::new();
    let (lamp, lamp_handle) = MockLamp::new();
    let (link, link_handle) = MockLink::new(true);

    let authz = AuthzClient::new(config.authz_config()).unwrap();
    let lock = spawn_lock(relay);
    let indicator = IndicatorController::new(lamp, Duration::from_millis(50));
    let controller = AccessController::new(config, reader, link, authz, lock.clone(), indicator);

    Pipeline {
        controller,
        reader: reader_handle,
        relay: relay_handle,
        lamp: lamp_handle,
        link: link_handle,
        lock,
    }
}

fn card() -> CardUid {
    CardUid::parse("AA:BB:CC:01").unwrap()
}

#[tokio::test]
async fn test_poll_with_no_card_decides_nothing() {
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);

    assert!(p.controller.poll_once().await.unwrap().is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_granted_card_energizes_then_relocks() {
    let (url, _hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);

    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");

    assert_eq!(decision.outcome, AuthorizationOutcome::Granted);
    assert_eq!(decision.uid, card());

    // Grant feedback completed: lamp was held then cleared
    assert_eq!(p.lamp.sets(), vec![true, false]);

    // The dwell timer relocks on its own, no further calls needed
    tokio::time::timeout(Duration::from_secs(1), p.lock.wait_for(LockState::Locked))
        .await
        .expect("relock within a second")
        .unwrap();
    assert!(!p.relay.is_energized());
    assert_eq!(p.relay.transitions(), vec![true, false]);
}

#[tokio::test]
async fn test_denied_card_never_touches_the_lock() {
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": false}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);

    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");

    assert_eq!(decision.outcome, AuthorizationOutcome::Denied);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(p.lock.state(), LockState::Locked);
    assert!(p.relay.transitions().is_empty());
    // Denied pattern: 3 pulses
    assert_eq!(p.lamp.pulse_count(), 3);
}

#[tokio::test]
async fn test_repeat_read_within_cooldown_is_suppressed() {
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);

    p.reader.present_card(card()).unwrap();
    assert!(p.controller.poll_once().await.unwrap().is_some());
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Same card again, still inside the 300ms cooldown: no second attempt
    p.reader.present_card(card()).unwrap();
    assert!(p.controller.poll_once().await.unwrap().is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // After the window elapses the same card is processed again
    tokio::time::sleep(Duration::from_millis(350)).await;
    p.reader.present_card(card()).unwrap();
    assert!(p.controller.poll_once().await.unwrap().is_some());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_debounce_follows_detection_time_of_replayed_reads() {
    // Reads stamped with explicit detection instants drive the cooldown
    // window directly, so no real waiting is needed.
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);
    let t0 = Instant::now();

    p.reader.present_read(CardRead::at(card(), t0)).unwrap();
    assert!(p.controller.poll_once().await.unwrap().is_some());

    // Stamped inside the 300ms window: suppressed
    p.reader
        .present_read(CardRead::at(card(), t0 + Duration::from_millis(200)))
        .unwrap();
    assert!(p.controller.poll_once().await.unwrap().is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // Stamped past the window: processed again
    p.reader
        .present_read(CardRead::at(card(), t0 + Duration::from_millis(400)))
        .unwrap();
    assert!(p.controller.poll_once().await.unwrap().is_some());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_link_down_denies_without_any_network_attempt() {
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);
    p.link.set_up(false);

    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");

    assert_eq!(decision.outcome, AuthorizationOutcome::Unreachable);
    // No network wait incurred
    assert!(decision.latency < Duration::from_millis(50));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(p.relay.transitions().is_empty());
    // Error pattern: 5 pulses
    assert_eq!(p.lamp.pulse_count(), 5);
}

#[tokio::test]
async fn test_link_restored_allows_next_attempt() {
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::ZERO,
    )
    .await;
    let mut p = pipeline(&url);

    p.link.set_up(false);
    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");
    assert_eq!(decision.outcome, AuthorizationOutcome::Unreachable);

    p.link.set_up(true);
    tokio::time::sleep(Duration::from_millis(350)).await;
    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");
    assert_eq!(decision.outcome, AuthorizationOutcome::Granted);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_slow_authority_times_out_and_late_grant_never_unlocks() {
    // Authority grants, but only after 500ms; the 200ms deadline wins.
    let (url, hits) = spawn_authority(
        http_response("200 OK", r#"{"granted": true}"#),
        Duration::from_millis(500),
    )
    .await;
    let mut p = pipeline(&url);

    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");

    assert_eq!(decision.outcome, AuthorizationOutcome::TimedOut);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(p.relay.transitions().is_empty());

    // Let the authority's late grant arrive into the abandoned connection:
    // it must not retroactively unlock anything.
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(p.lock.state(), LockState::Locked);
    assert!(p.relay.transitions().is_empty());
}

#[tokio::test]
async fn test_malformed_reply_fails_secure() {
    let (url, _hits) =
        spawn_authority(http_response("200 OK", "granted, I suppose"), Duration::ZERO).await;
    let mut p = pipeline(&url);

    p.reader.present_card(card()).unwrap();
    let decision = p.controller.poll_once().await.unwrap().expect("decision");

    assert_eq!(decision.outcome, AuthorizationOutcome::Malformed);
    assert!(p.relay.transitions().is_empty());
    assert_eq!(p.lamp.pulse_count(), 5);
}
