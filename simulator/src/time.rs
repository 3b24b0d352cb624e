//! Time source abstraction for record timestamps.
//!
//! Records are stamped with the wall clock in production. Tests swap in a
//! [`SimulatedTimeSource`] so that `created_at` is reproducible.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Abstraction over "what time is it now".
///
/// Implementations must be shareable with the background worker, hence the
/// `Send + Sync` bound.
pub trait TimeSource: Send + Sync {
    /// Get the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time source using the system clock.
///
/// This is the default implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A controllable time source for deterministic testing.
///
/// Time only advances when explicitly told to. Backed by an atomic so a
/// running simulator can read it while a test moves it forward.
///
/// # Example
///
/// ```
/// use simulator::time::{SimulatedTimeSource, TimeSource};
///
/// let time = SimulatedTimeSource::new(1_000);
/// assert_eq!(time.now().timestamp_millis(), 1_000);
///
/// time.advance(500);
/// assert_eq!(time.now().timestamp_millis(), 1_500);
/// ```
#[derive(Debug)]
pub struct SimulatedTimeSource {
    /// Current simulated time in milliseconds since Unix epoch.
    current_time_ms: AtomicI64,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source at the given epoch-millisecond instant.
    #[must_use]
    pub const fn new(initial_time_ms: i64) -> Self {
        Self {
            current_time_ms: AtomicI64::new(initial_time_ms),
        }
    }

    /// Start at `1_700_000_000_000` (approximately November 2023).
    #[must_use]
    pub const fn default_start() -> Self {
        Self::new(1_700_000_000_000)
    }

    /// Advance time by the given number of milliseconds.
    ///
    /// Saturates instead of wrapping.
    pub fn advance(&self, ms: i64) {
        let _ = self
            .current_time_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(ms))
            });
    }

    /// Jump to a specific instant. May move time backwards.
    pub fn set(&self, time_ms: i64) {
        self.current_time_ms.store(time_ms, Ordering::SeqCst);
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        // Out-of-range instants collapse to the epoch rather than panicking.
        DateTime::from_timestamp_millis(self.current_time_ms.load(Ordering::SeqCst))
            .unwrap_or_default()
    }
}

impl Default for SimulatedTimeSource {
    fn default() -> Self {
        Self::default_start()
    }
}
