// Life of a record:
// 1. The production loop picks a length in [min_length, max_length]
// 2. Filler words are drawn around a keyword planted at the midpoint
// 3. Ids and timestamp are attached, the text is checked for delimiters
// 4. The record is handed to the listener, which owns it from then on
// 5. The loop sleeps for the configured interval, or until stopped
//
// System components:
//  - Content synthesizer
//  - Record builder
//  - Stream simulator (worker task + handle)

pub mod config;
pub mod content;
pub mod listener;
pub mod record;
pub mod stream;
pub mod time;

mod e2e_tests;

pub use config::{AppConfig, ConfigError, SimulationConfig};
pub use listener::{ChannelListener, DeliveryError, LoggingListener, StatusListener};
pub use record::{MalformedRecordError, RecordBuilder, StatusRecord};
pub use stream::{
    MalformedPolicy, RunSummary, SimulatorError, SimulatorHandle, SimulatorState, StopHandle,
    StreamSimulator,
};
