//! Common helpers for end-to-end tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::SimulationConfig;
use crate::listener::{DeliveryError, StatusListener};
use crate::record::StatusRecord;

/// Upper bound for any wait in these tests.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a config from literal parts.
pub fn config(
    keywords: &[&str],
    min_length: usize,
    max_length: usize,
    interval_ms: u64,
) -> SimulationConfig {
    SimulationConfig {
        keywords: keywords.iter().map(ToString::to_string).collect(),
        min_length,
        max_length,
        interval_ms,
    }
}

/// Listener that keeps every record it receives.
///
/// Clones share the same storage, so a test keeps one clone and hands the
/// other to the simulator.
#[derive(Clone, Default)]
pub struct RecordingListener {
    records: Arc<Mutex<Vec<StatusRecord>>>,
}

impl RecordingListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    #[must_use]
    pub fn records(&self) -> Vec<StatusRecord> {
        self.records.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().expect("lock poisoned").len()
    }

    /// Poll until at least `count` records arrived or [`WAIT_TIMEOUT`] passes.
    pub async fn wait_for(&self, count: usize) -> bool {
        let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
        while tokio::time::Instant::now() < deadline {
            if self.len() >= count {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        self.len() >= count
    }
}

impl StatusListener for RecordingListener {
    fn on_status(&mut self, record: StatusRecord) -> Result<(), DeliveryError> {
        self.records.lock().expect("lock poisoned").push(record);
        Ok(())
    }
}

/// Split a record's text into tokens.
#[must_use]
pub fn tokens(record: &StatusRecord) -> Vec<&str> {
    record.text.split(' ').collect()
}
