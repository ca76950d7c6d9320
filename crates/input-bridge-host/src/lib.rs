//! input-bridge-host library entry point.
//!
//! Shares the module tree between the binary in `main.rs` and the unit tests.
//!
//! # What does the host do?
//!
//! The host process owns a [`SharedBridge`](input_bridge_core::SharedBridge)
//! over a simulated platform and speaks newline-delimited JSON on
//! stdin/stdout:
//!
//! 1. Loads [`config::HostConfig`] from TOML (or uses the defaults).
//! 2. Builds the simulated desktop from the configured monitors.
//! 3. Answers every command line with one response line, followed by the
//!    notifications the command produced.
//! 4. Accepts simulated OS events (raw deltas, cursor-shape changes, ...) on
//!    the same channel so the notification paths can be driven end to end.

/// Line-oriented JSON channel.
pub mod channel;

/// TOML configuration.
pub mod config;
