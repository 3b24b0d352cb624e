//! Test that listener failures are counted but never stop the stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::e2e_tests::helpers::*;
use crate::listener::DeliveryError;
use crate::record::StatusRecord;
use crate::stream::{SimulatorState, StreamSimulator};

#[tokio::test]
async fn test_failures_do_not_stop_loop() {
    let calls = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&calls);
    let listener = move |_: StatusRecord| -> Result<(), DeliveryError> {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            Err(DeliveryError::Rejected {
                reason: "broker unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    };

    let handle = StreamSimulator::new(config(&["rust"], 2, 4, 0))
        .with_seed(40)
        .start(listener)
        .expect("start");

    while calls.load(Ordering::SeqCst) < 50 {
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    assert_eq!(handle.state(), SimulatorState::Running);
    assert!(handle.delivery_failures() > 0);

    handle.stop();
    let summary = handle.join().await.expect("delivery errors are not fatal");

    let total = calls.load(Ordering::SeqCst);
    assert_eq!(summary.records_delivered + summary.delivery_failures, total);
    assert_eq!(summary.delivery_failures, total.div_ceil(2));
}

#[tokio::test]
async fn test_always_failing_listener_keeps_running() {
    let listener = |_: StatusRecord| -> Result<(), DeliveryError> { Err(DeliveryError::Disconnected) };

    let handle = StreamSimulator::new(config(&["rust"], 2, 4, 1))
        .with_seed(41)
        .start(listener)
        .expect("start");

    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    assert_eq!(handle.state(), SimulatorState::Running);
    assert!(handle.delivery_failures() > 0);
    assert_eq!(handle.records_delivered(), 0);

    handle.stop();
    handle.join().await.expect("clean stop");
}
