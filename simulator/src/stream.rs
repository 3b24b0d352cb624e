//! The background production loop.
//!
//! A [`StreamSimulator`] is configured while `Idle`, then [`started`] onto a
//! single tokio task. The task repeatedly builds a record, hands it to the
//! listener and waits the configured interval. The returned
//! [`SimulatorHandle`] stops and joins it.
//!
//! # Design
//!
//! The caller and the worker share only a stop signal (atomic flag plus
//! [`Notify`]) and a few counters. The worker owns the listener, the random
//! source and the record builder outright.
//!
//! # Invariants
//!
//! - Records reach the listener one at a time, in generation order
//! - No record is built once the worker has observed a stop request
//! - A delivery failure never ends the run
//! - A construction failure ends the run under [`MalformedPolicy::Stop`]
//!
//! [`started`]: StreamSimulator::start

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, SimulationConfig};
use crate::listener::StatusListener;
use crate::record::{MalformedRecordError, RecordBuilder, StatusRecord};
use crate::time::{SystemTimeSource, TimeSource};

/// What the loop does when a record cannot be constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// End the run and report the error from [`SimulatorHandle::join`].
    #[default]
    Stop,
    /// Log, count the record as skipped and keep producing.
    Skip,
}

impl std::str::FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stop" => Ok(Self::Stop),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown malformed-record policy: {other}")),
        }
    }
}

/// Lifecycle state of a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorState {
    /// Configured but not started.
    Idle,
    /// The production loop is live.
    Running,
    /// The loop has exited, after a stop request or a fatal error.
    Stopped,
}

/// Errors surfaced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    /// The config violates its invariants; the loop never started.
    InvalidConfig(ConfigError),
    /// `start` was called outside a tokio runtime.
    NoRuntime,
    /// A record could not be constructed and the run was ended.
    MalformedRecord(MalformedRecordError),
    /// The worker task panicked (usually inside the listener).
    WorkerPanicked(String),
}

impl std::fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(e) => write!(f, "invalid simulation config: {e}"),
            Self::NoRuntime => write!(f, "simulator must be started inside a tokio runtime"),
            Self::MalformedRecord(e) => write!(f, "error creating status: {e}"),
            Self::WorkerPanicked(message) => write!(f, "simulator worker panicked: {message}"),
        }
    }
}

impl std::error::Error for SimulatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::MalformedRecord(e) => Some(e),
            Self::NoRuntime | Self::WorkerPanicked(_) => None,
        }
    }
}

impl From<ConfigError> for SimulatorError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

impl From<MalformedRecordError> for SimulatorError {
    fn from(e: MalformedRecordError) -> Self {
        Self::MalformedRecord(e)
    }
}

/// Counters from a run that ended cooperatively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records the listener accepted.
    pub records_delivered: u64,
    /// Records the listener rejected.
    pub delivery_failures: u64,
    /// Records dropped under [`MalformedPolicy::Skip`].
    pub records_skipped: u64,
}

/// State shared between the handle(s) and the worker.
#[derive(Debug, Default)]
struct Shared {
    stop_requested: AtomicBool,
    stop_notify: Notify,
    running: AtomicBool,
    records_delivered: AtomicU64,
    delivery_failures: AtomicU64,
    records_skipped: AtomicU64,
}

impl Shared {
    fn request_stop(&self) {
        if !self.stop_requested.swap(true, Ordering::SeqCst) {
            self.stop_notify.notify_waiters();
        }
    }

    fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            records_delivered: self.records_delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Clears `running` when the worker exits, including by panic.
struct RunningGuard(Arc<Shared>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.running.store(false, Ordering::SeqCst);
    }
}

/// A configured, not yet started simulator.
pub struct StreamSimulator {
    config: SimulationConfig,
    rng: Option<StdRng>,
    time_source: Arc<dyn TimeSource>,
    malformed_policy: MalformedPolicy,
}

impl StreamSimulator {
    /// Create a simulator with wall-clock timestamps, an OS-seeded random
    /// source and [`MalformedPolicy::Stop`].
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            rng: None,
            time_source: Arc::new(SystemTimeSource),
            malformed_policy: MalformedPolicy::default(),
        }
    }

    /// Seed the random source for a reproducible stream.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    /// Use a caller-owned random source.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Stamp records with a custom time source.
    #[must_use]
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Choose what happens when a record cannot be constructed.
    #[must_use]
    pub const fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    /// The config this simulator will run with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Always [`SimulatorState::Idle`]; starting consumes the simulator.
    #[must_use]
    pub const fn state(&self) -> SimulatorState {
        SimulatorState::Idle
    }

    /// Validate the config and spawn the production loop.
    ///
    /// Returns as soon as the worker task is spawned.
    ///
    /// # Errors
    ///
    /// - `SimulatorError::InvalidConfig` if the config is invalid; nothing
    ///   is spawned and the listener is never called
    /// - `SimulatorError::NoRuntime` if called outside a tokio runtime
    pub fn start<L: StatusListener>(self, listener: L) -> Result<SimulatorHandle, SimulatorError> {
        self.config.validate()?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| SimulatorError::NoRuntime)?;

        tracing::info!(
            "Starting mock filtering with keywords {:?} (length {}..={}, interval {}ms)",
            self.config.keywords,
            self.config.min_length,
            self.config.max_length,
            self.config.interval_ms
        );

        let shared = Arc::new(Shared::default());
        shared.running.store(true, Ordering::SeqCst);

        let worker = Worker {
            config: self.config,
            rng: self.rng.unwrap_or_else(StdRng::from_os_rng),
            builder: RecordBuilder::new(self.time_source),
            malformed_policy: self.malformed_policy,
            listener,
            shared: Arc::clone(&shared),
        };
        let task = runtime.spawn(worker.run());

        Ok(SimulatorHandle {
            shared,
            task: Some(task),
        })
    }
}

/// Cloneable, thread-safe way to request a stop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    shared: Arc<Shared>,
}

impl StopHandle {
    /// Request cooperative termination. Idempotent.
    pub fn stop(&self) {
        self.shared.request_stop();
    }
}

/// Handle to a running simulator.
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct SimulatorHandle {
    shared: Arc<Shared>,
    task: Option<JoinHandle<Result<RunSummary, SimulatorError>>>,
}

impl SimulatorHandle {
    /// Request cooperative termination and return immediately.
    ///
    /// A record already in the listener is not interrupted; no new record is
    /// built afterwards. Calling this more than once is a no-op.
    pub fn stop(&self) {
        self.shared.request_stop();
    }

    /// A handle that can stop the simulator from another task or thread.
    #[must_use]
    pub fn stopper(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    #[must_use]
    pub fn state(&self) -> SimulatorState {
        if self.shared.running.load(Ordering::SeqCst) {
            SimulatorState::Running
        } else {
            SimulatorState::Stopped
        }
    }

    #[must_use]
    pub fn records_delivered(&self) -> u64 {
        self.shared.records_delivered.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn delivery_failures(&self) -> u64 {
        self.shared.delivery_failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn records_skipped(&self) -> u64 {
        self.shared.records_skipped.load(Ordering::Relaxed)
    }

    /// Wait for the worker to exit.
    ///
    /// This does not request a stop by itself: with no stop request and no
    /// fatal error it waits forever.
    ///
    /// # Errors
    ///
    /// - `SimulatorError::MalformedRecord` if the run ended on a construction error
    /// - `SimulatorError::WorkerPanicked` if the worker panicked
    pub async fn join(mut self) -> Result<RunSummary, SimulatorError> {
        let Some(task) = self.task.take() else {
            return Ok(self.shared.summary());
        };
        match task.await {
            Ok(result) => result,
            Err(e) => Err(SimulatorError::WorkerPanicked(e.to_string())),
        }
    }
}

impl Drop for SimulatorHandle {
    fn drop(&mut self) {
        self.shared.request_stop();
    }
}

/// Everything the production loop owns.
struct Worker<L> {
    config: SimulationConfig,
    rng: StdRng,
    builder: RecordBuilder<dyn TimeSource>,
    malformed_policy: MalformedPolicy,
    listener: L,
    shared: Arc<Shared>,
}

impl<L: StatusListener> Worker<L> {
    async fn run(mut self) -> Result<RunSummary, SimulatorError> {
        let _guard = RunningGuard(Arc::clone(&self.shared));
        let interval = Duration::from_millis(self.config.interval_ms);

        loop {
            if self.shared.is_stop_requested() {
                break;
            }

            match self.builder.build(&mut self.rng, &self.config) {
                Ok(_) if self.shared.is_stop_requested() => break,
                Ok(record) => self.deliver(record),
                Err(e) => match self.malformed_policy {
                    MalformedPolicy::Stop => {
                        tracing::error!("Error creating status, stopping stream: {e}");
                        return Err(SimulatorError::MalformedRecord(e));
                    }
                    MalformedPolicy::Skip => {
                        self.shared.records_skipped.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!("Error creating status, skipping record: {e}");
                    }
                },
            }

            if !pause(&self.shared, interval).await {
                break;
            }
        }

        let summary = self.shared.summary();
        tracing::info!(
            "Mock stream stopped: delivered={}, failed={}, skipped={}",
            summary.records_delivered,
            summary.delivery_failures,
            summary.records_skipped
        );
        Ok(summary)
    }

    fn deliver(&mut self, record: StatusRecord) {
        let id = record.id;
        match self.listener.on_status(record) {
            Ok(()) => {
                self.shared.records_delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.shared.delivery_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(id, "failed to deliver status: {e}");
            }
        }
    }
}

/// Wait out the inter-record delay.
///
/// Returns `false` if a stop was requested before or during the wait.
async fn pause(shared: &Shared, interval: Duration) -> bool {
    if interval.is_zero() {
        // Let other tasks (including whoever wants to stop us) run.
        tokio::task::yield_now().await;
        return !shared.is_stop_requested();
    }

    let notified = shared.stop_notify.notified();
    tokio::pin!(notified);
    // Register before checking the flag so a concurrent stop is not missed.
    if notified.as_mut().enable() || shared.is_stop_requested() {
        return false;
    }

    tokio::select! {
        () = tokio::time::sleep(interval) => !shared.is_stop_requested(),
        () = &mut notified => false,
    }
}
