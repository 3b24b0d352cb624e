//! Test the fatal-vs-skip handling of records that cannot be constructed.

use std::time::Duration;

use crate::e2e_tests::helpers::*;
use crate::record::MalformedRecordError;
use crate::stream::{MalformedPolicy, SimulatorError, SimulatorState, StreamSimulator};

#[tokio::test]
async fn test_stop_policy_ends_run_with_error() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["bad\u{1b}word"], 1, 1, 0))
        .with_seed(30)
        .start(listener.clone())
        .expect("config itself is valid");

    let result = tokio::time::timeout(Duration::from_secs(1), handle.join())
        .await
        .expect("run should end on its own");

    assert_eq!(
        result,
        Err(SimulatorError::MalformedRecord(
            MalformedRecordError::ControlCharacter {
                text: "bad\u{1b}word".to_string(),
                position: 3,
            }
        ))
    );
    assert_eq!(listener.len(), 0);
}

#[tokio::test]
async fn test_stop_policy_reports_stopped_state() {
    let handle = StreamSimulator::new(config(&["bad\u{0}"], 1, 1, 0))
        .with_malformed_policy(MalformedPolicy::Stop)
        .with_seed(31)
        .start(RecordingListener::new())
        .expect("start");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(handle.state(), SimulatorState::Stopped);
    assert!(handle.join().await.is_err());
}

#[tokio::test]
async fn test_skip_policy_keeps_producing() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["good", "bad\u{0}"], 1, 1, 0))
        .with_malformed_policy(MalformedPolicy::Skip)
        .with_seed(32)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(20).await);
    assert_eq!(handle.state(), SimulatorState::Running);
    handle.stop();
    let summary = handle.join().await.expect("skip policy never fails the run");

    assert!(summary.records_skipped > 0);
    assert!(summary.records_delivered >= 20);
    assert!(listener.records().iter().all(|r| r.text == "good"));
}
