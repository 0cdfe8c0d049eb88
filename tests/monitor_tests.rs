use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::watch;

use fraudwatch::adapter::outbound::backend::dto::message::decode_frame;
use fraudwatch::application::monitor::{
    ConnectionState, DisconnectCause, MonitorController, MonitorSnapshot, StreamFactory,
};
use fraudwatch::domain::Severity;
use fraudwatch::port::{RealtimeStream, StreamEvent, SubscribeRequest};
use fraudwatch::testkit::{self, stream::ScriptedStream};

async fn wait_until(
    rx: &mut watch::Receiver<MonitorSnapshot>,
    condition: impl FnMut(&MonitorSnapshot) -> bool,
) -> MonitorSnapshot {
    rx.wait_for(condition).await.expect("controller alive").clone()
}

fn controller(factory: StreamFactory) -> MonitorController {
    MonitorController::new(factory, testkit::config::monitor())
}

#[tokio::test]
async fn live_feed_updates_lists_and_stats() {
    let (stream, handle) = testkit::stream::channel_stream(8);
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    assert!(monitor.start());
    wait_until(&mut rx, |s| s.state == ConnectionState::Connected).await;

    assert!(
        handle
            .send_message(testkit::domain::latest_transaction("t1", dec!(9100), true))
            .await
    );
    assert!(
        handle
            .send_message(testkit::domain::new_alert("a1", Severity::Critical))
            .await
    );

    let snapshot = wait_until(&mut rx, |s| !s.alerts.is_empty()).await;
    assert!(snapshot.monitoring);
    assert_eq!(snapshot.transactions.len(), 1);
    assert_eq!(snapshot.transactions[0].id.as_str(), "t1");
    assert_eq!(snapshot.stats.active_transactions, 1);
    assert_eq!(snapshot.stats.anomalies_detected, 1);
    assert_eq!(snapshot.stats.total_volume, dec!(9100));
    assert_eq!(snapshot.stats.critical_alerts, 1);
    assert_eq!(snapshot.stats.anomaly_ratio, Some(1.0));

    assert_eq!(
        handle.counters().requests(),
        vec![SubscribeRequest::subscribe()]
    );

    assert!(monitor.stop().await);
    assert!(handle.is_closed());
    assert_eq!(handle.counters().close_count(), 1);

    let last = monitor.snapshot();
    assert_eq!(last.state, ConnectionState::Closed);
    assert!(!last.monitoring);
    assert_eq!(last.disconnect, Some(DisconnectCause::Stopped));
    assert_eq!(last.transactions.len(), 1);
}

#[tokio::test]
async fn messages_after_stop_are_not_applied() {
    let (stream, handle) = testkit::stream::channel_stream(8);
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    monitor.start();
    wait_until(&mut rx, |s| s.state == ConnectionState::Connected).await;
    monitor.stop().await;

    let delivered = handle
        .send_message(testkit::domain::latest_transaction("late", dec!(1), false))
        .await;
    assert!(!delivered);
    assert!(monitor.snapshot().transactions.is_empty());
}

#[tokio::test]
async fn stream_error_ends_monitoring_with_cause() {
    let (stream, handle) = testkit::stream::channel_stream(8);
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    monitor.start();
    wait_until(&mut rx, |s| s.state == ConnectionState::Connected).await;
    handle
        .send(StreamEvent::Error {
            reason: "connection reset".into(),
        })
        .await;

    let snapshot = wait_until(&mut rx, |s| s.state == ConnectionState::Closed).await;
    assert!(!snapshot.monitoring);
    assert_eq!(
        snapshot.disconnect,
        Some(DisconnectCause::Error("connection reset".into()))
    );
    assert!(snapshot.disconnect.as_ref().is_some_and(DisconnectCause::is_failure));
    assert!(handle.is_closed());

    // The session already ended; stop only reaps it.
    monitor.stop().await;
    assert_eq!(handle.counters().close_count(), 1);
}

#[tokio::test]
async fn peer_close_is_recorded_with_reason() {
    let stream = ScriptedStream::new().with_events(vec![
        StreamEvent::Message(testkit::domain::transaction_snapshot(3)),
        StreamEvent::Closed {
            reason: Some("server shutdown".into()),
        },
    ]);
    let counters = stream.counters();
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    monitor.start();
    let snapshot = wait_until(&mut rx, |s| s.state == ConnectionState::Closed).await;

    assert_eq!(
        snapshot.disconnect,
        Some(DisconnectCause::Closed(Some("server shutdown".into())))
    );
    assert_eq!(snapshot.transactions.len(), 3);
    assert_eq!(counters.close_count(), 1);
}

#[tokio::test]
async fn connect_failure_never_subscribes() {
    let stream = ScriptedStream::new().with_connect_results(vec![Err(
        fraudwatch::error::Error::Connection("refused".into()),
    )]);
    let counters = stream.counters();
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    monitor.start();
    let snapshot = wait_until(&mut rx, |s| s.state == ConnectionState::Closed).await;

    assert!(matches!(snapshot.disconnect, Some(DisconnectCause::Error(_))));
    assert_eq!(counters.connect_count(), 1);
    assert_eq!(counters.subscribe_count(), 0);
    assert_eq!(counters.close_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_connect_times_out() {
    let stream = ScriptedStream::new().with_connect_delay(Duration::from_secs(30));
    let counters = stream.counters();
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();
    let started = tokio::time::Instant::now();

    monitor.start();
    let snapshot = wait_until(&mut rx, |s| s.state == ConnectionState::Closed).await;

    assert_eq!(
        snapshot.disconnect,
        Some(DisconnectCause::Error("connect timed out after 500 ms".into()))
    );
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(counters.subscribe_count(), 0);
}

#[tokio::test]
async fn start_while_running_is_noop() {
    let (stream, handle) = testkit::stream::channel_stream(8);
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    assert!(monitor.start());
    wait_until(&mut rx, |s| s.state == ConnectionState::Connected).await;
    assert!(!monitor.start());
    assert!(monitor.is_running());
    assert_eq!(handle.counters().connect_count(), 1);

    monitor.stop().await;
    assert!(!monitor.stop().await);
}

#[tokio::test]
async fn restart_begins_with_empty_lists() {
    let factory: StreamFactory = Arc::new(|| -> Box<dyn RealtimeStream> {
        Box::new(ScriptedStream::new().with_messages(vec![
            testkit::domain::latest_transaction("t1", dec!(50), false),
        ]))
    });
    let monitor = controller(factory);
    let mut rx = monitor.subscribe();

    monitor.start();
    wait_until(&mut rx, |s| s.transactions.len() == 1).await;
    monitor.stop().await;
    assert_eq!(monitor.snapshot().transactions.len(), 1);

    monitor.start();
    let snapshot = wait_until(&mut rx, |s| {
        s.state == ConnectionState::Connected && s.transactions.len() == 1
    })
    .await;
    assert_eq!(snapshot.stats.total_volume, dec!(50));
    assert_eq!(snapshot.disconnect, None);

    monitor.stop().await;
}

#[tokio::test]
async fn oversized_amounts_saturate_volume_and_still_stop() {
    let frame = r#"{"latest_transaction":{"id":"big","amount":50000000000000000000000000000}}"#;
    let first = decode_frame(frame).expect("frame decodes");
    let second = decode_frame(frame).expect("frame decodes");
    let stream = ScriptedStream::new().with_messages(vec![first, second]);
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    monitor.start();
    let snapshot = wait_until(&mut rx, |s| s.transactions.len() == 2).await;
    assert_eq!(snapshot.stats.total_volume, Decimal::MAX);

    assert!(monitor.stop().await);
    let last = monitor.snapshot();
    assert_eq!(last.state, ConnectionState::Closed);
    assert_eq!(last.disconnect, Some(DisconnectCause::Stopped));
}

#[tokio::test(start_paused = true)]
async fn stop_does_not_wait_for_a_slow_subscribe() {
    let stream = ScriptedStream::new().with_subscribe_delay(Duration::from_secs(3600));
    let counters = stream.counters();
    let monitor = controller(testkit::stream::single_use_factory(stream));
    let mut rx = monitor.subscribe();

    monitor.start();
    wait_until(&mut rx, |s| s.state == ConnectionState::Connected).await;
    tokio::task::yield_now().await;

    let stopped = tokio::time::timeout(Duration::from_secs(1), monitor.stop()).await;
    assert_eq!(stopped.ok(), Some(true));
    assert_eq!(counters.subscribe_count(), 1);
    assert_eq!(
        monitor.snapshot().disconnect,
        Some(DisconnectCause::Stopped)
    );
}
