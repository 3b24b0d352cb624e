//! Test the documented keyword placement on a live stream.

use crate::content::FILLER_WORDS;
use crate::e2e_tests::helpers::*;
use crate::stream::StreamSimulator;

#[tokio::test]
async fn test_three_tokens_keyword_in_middle() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["rust"], 3, 3, 10))
        .with_seed(3)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(5).await, "expected 5 records");
    handle.stop();
    handle.join().await.expect("clean stop");

    for record in listener.records() {
        let tokens = tokens(&record);
        assert_eq!(tokens.len(), 3, "text: {}", record.text);
        // 3 / 2 == 1
        assert_eq!(tokens[1], "rust");
        assert!(FILLER_WORDS.contains(&tokens[0]));
        assert!(FILLER_WORDS.contains(&tokens[2]));
    }
}

#[tokio::test]
async fn test_single_token_is_keyword() {
    let listener = RecordingListener::new();
    let handle = StreamSimulator::new(config(&["kafka"], 1, 1, 0))
        .with_seed(4)
        .start(listener.clone())
        .expect("start");

    assert!(listener.wait_for(10).await);
    handle.stop();
    handle.join().await.expect("clean stop");

    assert!(listener.records().iter().all(|r| r.text == "kafka"));
}
