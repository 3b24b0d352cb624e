//! Test that invalid configs are rejected synchronously and produce nothing.

use crate::e2e_tests::helpers::*;
use crate::stream::{SimulatorError, StreamSimulator};

#[tokio::test]
async fn test_empty_keywords_rejected() {
    let listener = RecordingListener::new();
    let result = StreamSimulator::new(config(&[], 3, 3, 0)).start(listener.clone());

    assert!(matches!(result, Err(SimulatorError::InvalidConfig(_))));
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(listener.len(), 0);
}

#[tokio::test]
async fn test_max_below_min_rejected() {
    let listener = RecordingListener::new();
    let result = StreamSimulator::new(config(&["rust"], 5, 4, 0)).start(listener.clone());

    assert!(matches!(result, Err(SimulatorError::InvalidConfig(_))));
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(listener.len(), 0);
}

#[tokio::test]
async fn test_zero_min_length_rejected() {
    let result = StreamSimulator::new(config(&["rust"], 0, 4, 0)).start(RecordingListener::new());
    assert!(matches!(result, Err(SimulatorError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_multi_word_keyword_rejected() {
    let result =
        StreamSimulator::new(config(&["two words"], 1, 4, 0)).start(RecordingListener::new());
    assert!(matches!(result, Err(SimulatorError::InvalidConfig(_))));
}
