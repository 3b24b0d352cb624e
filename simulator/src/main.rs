#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use simulator::{AppConfig, LoggingListener, StreamSimulator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Some(message) = &config.welcome_message {
        tracing::info!("{message}");
    }
    tracing::info!(
        "Loaded configuration: keywords={:?}, length={}..={}, sleep_ms={}, on_malformed={:?}",
        config.simulation.keywords,
        config.simulation.min_length,
        config.simulation.max_length,
        config.simulation.interval_ms,
        config.malformed_policy
    );

    let mut simulator = StreamSimulator::new(config.simulation)
        .with_malformed_policy(config.malformed_policy);
    if let Some(seed) = config.seed {
        tracing::info!("Using fixed seed {seed}");
        simulator = simulator.with_seed(seed);
    }

    let handle = match simulator.start(LoggingListener) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to start simulator: {e}");
            std::process::exit(1);
        }
    };

    // Stop on Ctrl-C; the loop finishes its current record and exits.
    let stopper = handle.stopper();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl-C, stopping stream");
                stopper.stop();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    match handle.join().await {
        Ok(summary) => {
            tracing::info!(
                "Simulator finished: delivered={}, failed={}, skipped={}",
                summary.records_delivered,
                summary.delivery_failures,
                summary.records_skipped
            );
        }
        Err(e) => {
            tracing::error!("Simulator stopped with error: {e}");
            std::process::exit(1);
        }
    }
}
