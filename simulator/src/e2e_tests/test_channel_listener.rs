//! Test forwarding a live stream into a channel, as a broker publisher would.

use std::time::Duration;

use crate::e2e_tests::helpers::*;
use crate::listener::ChannelListener;
use crate::stream::StreamSimulator;

#[tokio::test]
async fn test_records_arrive_through_channel() {
    let (listener, mut receiver) = ChannelListener::channel(64);
    let handle = StreamSimulator::new(config(&["kafka"], 4, 4, 1))
        .with_seed(60)
        .start(listener)
        .expect("start");

    let mut received = Vec::new();
    while received.len() < 10 {
        let record = tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .expect("record within a second")
            .expect("channel open");
        received.push(record);
    }
    handle.stop();
    handle.join().await.expect("clean stop");

    for record in &received {
        assert_eq!(tokens(record)[2], "kafka");
        let json: serde_json::Value =
            serde_json::from_str(&record.to_json().expect("serialize")).expect("parse");
        assert_eq!(json["text"], record.text.as_str());
        assert_eq!(json["user"]["id"], record.author_id);
    }
}

#[tokio::test]
async fn test_full_channel_counts_failures() {
    let (listener, _receiver) = ChannelListener::channel(2);
    let handle = StreamSimulator::new(config(&["kafka"], 4, 4, 0))
        .with_seed(61)
        .start(listener)
        .expect("start");

    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.stop();
    let summary = handle.join().await.expect("full channel is not fatal");

    assert_eq!(summary.records_delivered, 2);
    assert!(summary.delivery_failures > 0);
}
