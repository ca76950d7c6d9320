//! input-bridge-host binary entry point.
//!
//! Reads commands from stdin, one JSON object per line, and writes responses
//! and notifications to stdout.  Logs go to stderr so stdout stays a clean
//! channel.
//!
//! ```bash
//! echo '{"method":"getMonitorCount"}' | input-bridge-host --config bridge.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use input_bridge_core::platform::mock::RecordingPlatform;
use input_bridge_core::{BridgeSession, Command, SharedBridge};
use input_bridge_host::channel::serve;
use input_bridge_host::config::{load_config, HostConfig};
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote-input bridge host.
///
/// Drives a bridge session over a simulated desktop through a
/// newline-delimited JSON channel on stdin/stdout.
#[derive(Debug, Parser)]
#[command(
    name = "input-bridge-host",
    about = "Newline-delimited JSON host for the remote-input bridge",
    version
)]
struct Cli {
    /// Path to the TOML configuration file.  A missing file means defaults.
    #[arg(long, default_value = "input-bridge.toml", env = "INPUT_BRIDGE_CONFIG")]
    config: PathBuf,

    /// Log level used when `RUST_LOG` is unset; overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// The effective fallback log level.
    fn log_level<'a>(&'a self, config: &'a HostConfig) -> &'a str {
        self.log_level.as_deref().unwrap_or(&config.bridge.log_level)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the CLI or config level applies.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level(&config))),
        )
        .init();

    let platform = Arc::new(
        RecordingPlatform::with_layout(config.to_layout())
            .with_native_origin(config.vertical_origin())
            .with_system_cursors(config.system_cursors()),
    );
    let session = BridgeSession::new(platform, config.session_options())
        .context("failed to start bridge session")?;
    let bridge = SharedBridge::new(session);

    info!(
        config = %cli.config.display(),
        platform = config.bridge.platform.name(),
        "input bridge host ready"
    );

    // ── Main channel loop ─────────────────────────────────────────────────────
    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = tokio::select! {
        result = serve(&bridge, stdin, tokio::io::stdout()) => {
            if result.is_ok() {
                info!("stdin closed");
            }
            result
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("received Ctrl+C, shutting down"),
                Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
            }
            Ok(())
        }
    };

    // Leave the local pointer usable on exit.
    if bridge.is_locked() {
        if let Err(e) = bridge.execute(Command::UnlockCursor) {
            error!("failed to release the cursor on shutdown: {e}");
        }
    }

    outcome.context("channel I/O failed")?;
    info!("input bridge host stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        // Arrange: parse with no arguments (all defaults apply)
        let cli = Cli::try_parse_from(["input-bridge-host"]).expect("defaults parse");

        // Assert
        assert!(cli.log_level.is_none());
        if std::env::var_os("INPUT_BRIDGE_CONFIG").is_none() {
            assert_eq!(cli.config, PathBuf::from("input-bridge.toml"));
        }
    }

    #[test]
    fn test_cli_log_level_overrides_config() {
        let cli = Cli::try_parse_from(["input-bridge-host", "--log-level", "trace"])
            .expect("valid args");
        let config = HostConfig::default();

        assert_eq!(cli.log_level(&config), "trace");
    }

    #[test]
    fn test_config_log_level_applies_without_flag() {
        let cli = Cli::try_parse_from(["input-bridge-host", "--config", "other.toml"])
            .expect("valid args");
        let mut config = HostConfig::default();
        config.bridge.log_level = "warn".to_string();

        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(cli.log_level(&config), "warn");
    }
}
