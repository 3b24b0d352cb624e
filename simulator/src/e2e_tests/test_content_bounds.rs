//! Test that every record carries a keyword and respects the length bounds.

use std::collections::HashSet;

use crate::e2e_tests::helpers::*;
use crate::stream::StreamSimulator;

#[tokio::test]
async fn test_keyword_and_length_bounds() {
    let keywords = ["Java", "Microservices", "Kafka", "Elasticsearch"];
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&keywords, 2, 6, 0))
        .with_seed(17)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(200).await);
    handle.stop();
    handle.join().await.expect("clean stop");

    let mut lengths = HashSet::new();
    for record in listener.records() {
        let tokens = tokens(&record);
        assert!(
            (2..=6).contains(&tokens.len()),
            "length {} out of bounds: {}",
            tokens.len(),
            record.text
        );
        assert!(
            tokens.iter().any(|t| keywords.contains(t)),
            "no keyword in: {}",
            record.text
        );
        assert_eq!(record.text.trim(), record.text);
        lengths.insert(tokens.len());
    }

    assert_eq!(lengths.len(), 5, "all lengths 2..=6 should appear");
}

#[tokio::test]
async fn test_ids_non_negative_as_signed() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 1, 3, 0))
        .with_seed(18)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(50).await);
    handle.stop();
    handle.join().await.expect("clean stop");

    for record in listener.records() {
        assert!(i64::try_from(record.id).is_ok());
        assert!(i64::try_from(record.author_id).is_ok());
    }
}
