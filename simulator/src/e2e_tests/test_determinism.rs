//! Test that a seeded simulator delivers exactly the records a seeded
//! builder produces, in the same order.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::e2e_tests::helpers::*;
use crate::record::RecordBuilder;
use crate::stream::StreamSimulator;
use crate::time::SimulatedTimeSource;

const START_MS: i64 = 1_700_000_000_000;

async fn run_stream(seed: u64, count: usize) -> Vec<crate::record::StatusRecord> {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["java", "kafka", "rust"], 3, 12, 0))
        .with_seed(seed)
        .with_time_source(Arc::new(SimulatedTimeSource::new(START_MS)))
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(count).await);
    handle.stop();
    handle.join().await.expect("clean stop");

    let mut records = listener.records();
    records.truncate(count);
    records
}

#[tokio::test]
async fn test_stream_matches_builder_sequence() {
    let records = run_stream(50, 25).await;

    let builder = RecordBuilder::new(Arc::new(SimulatedTimeSource::new(START_MS)));
    let mut rng = StdRng::seed_from_u64(50);
    let config = config(&["java", "kafka", "rust"], 3, 12, 0);
    let expected: Vec<_> = (0..25)
        .map(|_| builder.build(&mut rng, &config).expect("build"))
        .collect();

    assert_eq!(records, expected);
}

#[tokio::test]
async fn test_same_seed_same_stream() {
    let first = run_stream(51, 30).await;
    let second = run_stream(51, 30).await;
    assert_eq!(first, second);

    let other = run_stream(52, 30).await;
    assert_ne!(first, other);
}

#[tokio::test]
async fn test_timestamps_follow_time_source() {
    let time = Arc::new(SimulatedTimeSource::new(START_MS));
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 3, 0))
        .with_seed(53)
        .with_time_source(Arc::clone(&time) as Arc<dyn crate::time::TimeSource>)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(1).await);
    time.set(START_MS + 60_000);
    let seen = listener.len();
    assert!(listener.wait_for(seen + 5).await);
    handle.stop();
    handle.join().await.expect("clean stop");

    let records = listener.records();
    assert_eq!(records[0].created_at.timestamp_millis(), START_MS);
    assert_eq!(
        records[records.len() - 1].created_at.timestamp_millis(),
        START_MS + 60_000
    );
}
