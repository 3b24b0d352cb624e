//! Downstream consumers of synthesized records.
//!
//! The production loop owns exactly one [`StatusListener`] and calls it
//! synchronously, one record at a time, in generation order. What the
//! listener does with the record (log it, publish it to a broker, drop it)
//! is its own business.

use tokio::sync::mpsc;

use crate::record::StatusRecord;

/// Error returned by a listener that could not take a record.
///
/// Delivery errors never stop the production loop; they are logged and
/// counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The listener refused this record (e.g. downstream buffer full).
    Rejected { reason: String },
    /// The downstream consumer is gone.
    Disconnected,
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { reason } => write!(f, "record rejected: {reason}"),
            Self::Disconnected => write!(f, "downstream consumer disconnected"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Capability to accept one [`StatusRecord`] at a time.
pub trait StatusListener: Send + 'static {
    /// Take ownership of a record.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] if the record could not be accepted.
    fn on_status(&mut self, record: StatusRecord) -> Result<(), DeliveryError>;
}

impl<F> StatusListener for F
where
    F: FnMut(StatusRecord) -> Result<(), DeliveryError> + Send + 'static,
{
    fn on_status(&mut self, record: StatusRecord) -> Result<(), DeliveryError> {
        self(record)
    }
}

/// Logs every record as status JSON at INFO level.
#[derive(Debug, Default)]
pub struct LoggingListener;

impl StatusListener for LoggingListener {
    fn on_status(&mut self, record: StatusRecord) -> Result<(), DeliveryError> {
        let json = record.to_json().map_err(|e| DeliveryError::Rejected {
            reason: e.to_string(),
        })?;
        tracing::info!(id = record.id, "received status: {json}");
        Ok(())
    }
}

/// Forwards records into a bounded channel without blocking the worker.
///
/// The receiving half is typically drained by a task that publishes to a
/// message broker.
#[derive(Debug)]
pub struct ChannelListener {
    sender: mpsc::Sender<StatusRecord>,
}

impl ChannelListener {
    /// Create a listener and the receiver it feeds.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StatusRecord>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl StatusListener for ChannelListener {
    fn on_status(&mut self, record: StatusRecord) -> Result<(), DeliveryError> {
        self.sender.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(record) => DeliveryError::Rejected {
                reason: format!("channel full, dropped status {}", record.id),
            },
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::sync::{Arc, Mutex};

    fn record(id: u64) -> StatusRecord {
        StatusRecord {
            id,
            author_id: 1,
            created_at: DateTime::from_timestamp_millis(0).unwrap_or_default(),
            text: "Lorem rust ipsum".to_string(),
        }
    }

    #[test]
    fn test_closure_is_listener() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut listener = move |r: StatusRecord| -> Result<(), DeliveryError> {
            sink.lock().expect("lock").push(r.id);
            Ok(())
        };

        StatusListener::on_status(&mut listener, record(1)).expect("deliver");
        StatusListener::on_status(&mut listener, record(2)).expect("deliver");
        assert_eq!(*seen.lock().expect("lock"), vec![1, 2]);

        let mut failing = |_: StatusRecord| -> Result<(), DeliveryError> {
            Err(DeliveryError::Disconnected)
        };
        assert_eq!(
            StatusListener::on_status(&mut failing, record(3)),
            Err(DeliveryError::Disconnected)
        );
    }

    #[test]
    fn test_logging_listener_accepts() {
        let mut listener = LoggingListener;
        assert_eq!(listener.on_status(record(5)), Ok(()));
    }

    #[tokio::test]
    async fn test_channel_listener_forwards_in_order() {
        let (mut listener, mut receiver) = ChannelListener::channel(4);
        listener.on_status(record(1)).expect("deliver");
        listener.on_status(record(2)).expect("deliver");

        assert_eq!(receiver.recv().await.map(|r| r.id), Some(1));
        assert_eq!(receiver.recv().await.map(|r| r.id), Some(2));
    }

    #[test]
    fn test_channel_listener_full_is_rejected() {
        let (mut listener, _receiver) = ChannelListener::channel(1);
        listener.on_status(record(1)).expect("deliver");

        assert_eq!(
            listener.on_status(record(2)),
            Err(DeliveryError::Rejected {
                reason: "channel full, dropped status 2".to_string()
            })
        );
    }

    #[test]
    fn test_channel_listener_closed_is_disconnected() {
        let (mut listener, receiver) = ChannelListener::channel(1);
        drop(receiver);
        assert_eq!(
            listener.on_status(record(1)),
            Err(DeliveryError::Disconnected)
        );
    }

    #[test]
    fn test_delivery_error_display() {
        let error = DeliveryError::Rejected {
            reason: "busy".to_string(),
        };
        assert_eq!(error.to_string(), "record rejected: busy");
        assert_eq!(
            DeliveryError::Disconnected.to_string(),
            "downstream consumer disconnected"
        );
    }
}
