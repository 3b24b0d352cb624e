//! End-to-end tests driving a real simulator on a tokio runtime.
//!
//! Each test file covers one scenario, using seeded random sources so that
//! failures reproduce.

#![cfg(test)]

mod helpers;

mod test_channel_listener;
mod test_content_bounds;
mod test_delivery_failures;
mod test_determinism;
mod test_invalid_config;
mod test_malformed_policy;
mod test_midpoint_rule;
mod test_stop;
mod test_zero_interval;
