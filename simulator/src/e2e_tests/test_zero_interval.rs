//! Test that a zero interval produces back-to-back records.

use std::time::{Duration, Instant};

use crate::e2e_tests::helpers::*;
use crate::stream::StreamSimulator;

#[tokio::test]
async fn test_zero_interval_is_unthrottled() {
    let listener = RecordingListener::new();
    let started = Instant::now();
    let handle = StreamSimulator::new(config(&["rust"], 5, 10, 0))
        .with_seed(5)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(1_000).await);
    let elapsed = started.elapsed();
    handle.stop();
    let summary = handle.join().await.expect("clean stop");

    assert!(summary.records_delivered >= 1_000);
    // A 1ms interval alone would take a full second for 1000 records
    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
}

#[tokio::test]
async fn test_interval_throttles() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 5, 10, 50))
        .with_seed(6)
        .start(listener.clone())
        .expect("start");

    tokio::time::sleep(Duration::from_millis(120)).await;
    handle.stop();
    let summary = handle.join().await.expect("clean stop");

    // Records at ~0ms, ~50ms, ~100ms; allow scheduling slack
    assert!(
        (1..=4).contains(&summary.records_delivered),
        "delivered {}",
        summary.records_delivered
    );
}
