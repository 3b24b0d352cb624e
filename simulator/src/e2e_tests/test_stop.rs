//! Test stop semantics: quiescence, idempotence and state transitions.

use std::time::Duration;

use crate::e2e_tests::helpers::*;
use crate::stream::{SimulatorState, StreamSimulator};

#[tokio::test]
async fn test_no_deliveries_after_stop() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 8, 1))
        .with_seed(20)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(5).await);
    handle.stop();
    let at_stop = listener.len();

    // Grace period: nothing new may arrive
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(listener.len(), at_stop);

    let summary = handle.join().await.expect("clean stop");
    assert_eq!(summary.records_delivered, at_stop as u64);
    assert_eq!(listener.len(), at_stop);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_no_deliveries_after_join_multi_thread() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 8, 0))
        .with_seed(21)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(100).await);
    handle.stop();
    let summary = handle.join().await.expect("clean stop");
    let after_join = listener.len();
    assert_eq!(summary.records_delivered, after_join as u64);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(listener.len(), after_join);
}

#[tokio::test]
async fn test_stop_interrupts_long_interval() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 3, 60_000))
        .with_seed(22)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(1).await);
    handle.stop();

    // The minute-long sleep must be cut short
    let summary = tokio::time::timeout(Duration::from_secs(1), handle.join())
        .await
        .expect("join should not wait for the interval")
        .expect("clean stop");
    assert_eq!(summary.records_delivered, 1);
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 3, 5))
        .with_seed(23)
        .start(listener.clone())
        .expect("start");

    assert_eq!(handle.state(), SimulatorState::Running);
    assert!(listener.wait_for(2).await);

    handle.stop();
    handle.stop();
    handle.stopper().stop();

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(handle.state(), SimulatorState::Stopped);

    // Stopping an already stopped simulator is still a no-op
    handle.stop();
    assert_eq!(handle.state(), SimulatorState::Stopped);
    handle.join().await.expect("clean stop");
}

#[tokio::test]
async fn test_stop_from_another_thread() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 3, 5))
        .with_seed(24)
        .start(listener.clone())
        .expect("start");
    assert!(listener.wait_for(1).await);

    let stopper = handle.stopper();
    std::thread::spawn(move || stopper.stop())
        .join()
        .expect("stopper thread");

    tokio::time::timeout(Duration::from_secs(1), handle.join())
        .await
        .expect("worker should exit")
        .expect("clean stop");
}

#[tokio::test]
async fn test_dropping_handle_stops_stream() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 3, 1))
        .with_seed(25)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(3).await);
    drop(handle);

    // Let the worker observe the stop
    tokio::time::sleep(Duration::from_millis(20)).await;
    let after_drop = listener.len();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(listener.len(), after_drop);
}
