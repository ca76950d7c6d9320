//! TOML configuration for the bridge host.
//!
//! The host runs against a simulated platform, so the configuration carries
//! both the bridge behaviour switches and the monitor layout the simulated
//! desktop reports.  Example:
//!
//! ```toml
//! [bridge]
//! platform = "macos"
//! vertical_origin = "native"
//! accumulate_subpixel = true
//! stock_cursors = true
//! log_level = "debug"
//!
//! [[monitors]]
//! width = 2560
//! height = 1440
//! scale_factor = 2.0
//!
//! [[monitors]]
//! origin_x = 2560
//! width = 1920
//! height = 1080
//! ```
//!
//! # Serde default values
//!
//! Every field is optional.  An absent field takes the value of its
//! `default_*` function, and an absent file yields [`HostConfig::default`]:
//! the build target's platform with one 1920x1080 monitor at scale 1.0.

use std::path::{Path, PathBuf};

use input_bridge_core::{
    BridgeError, CursorSnapshot, MonitorDescriptor, MonitorLayout, PlatformKind, SessionOptions,
    VerticalOrigin, WellKnownCursor,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error other than "not found".
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The TOML parsed but describes an unusable monitor layout.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level host configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Monitors reported by the simulated platform, in index order.
    #[serde(default = "default_monitors")]
    pub monitors: Vec<MonitorConfig>,
}

/// Bridge behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// Key table and vertical convention to emulate.
    #[serde(default = "default_platform")]
    pub platform: PlatformKind,
    /// Vertical convention of the simulated injection API.
    #[serde(default = "default_origin")]
    pub vertical_origin: OriginSetting,
    /// Carry sub-pixel remainders between relative moves.
    #[serde(default = "default_false")]
    pub accumulate_subpixel: bool,
    /// Report the built-in arrow bitmap as the platform's stock arrow cursor.
    #[serde(default = "default_true")]
    pub stock_cursors: bool,
    /// `tracing` log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Configured vertical convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OriginSetting {
    /// Whatever the configured platform uses natively.
    Native,
    TopLeft,
    BottomLeft,
}

impl OriginSetting {
    /// Resolves the setting against `platform`.
    pub fn resolve(self, platform: PlatformKind) -> VerticalOrigin {
        match self {
            Self::Native => platform.vertical_origin(),
            Self::TopLeft => VerticalOrigin::TopLeft,
            Self::BottomLeft => VerticalOrigin::BottomLeft,
        }
    }
}

/// One simulated monitor, in top-left desktop coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    #[serde(default)]
    pub origin_x: i32,
    #[serde(default)]
    pub origin_y: i32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_platform() -> PlatformKind {
    if cfg!(target_os = "macos") {
        PlatformKind::Macos
    } else if cfg!(target_os = "windows") {
        PlatformKind::Windows
    } else {
        PlatformKind::X11
    }
}
fn default_origin() -> OriginSetting {
    OriginSetting::Native
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_width() -> u32 {
    1920
}
fn default_height() -> u32 {
    1080
}
fn default_scale_factor() -> f64 {
    1.0
}
fn default_monitors() -> Vec<MonitorConfig> {
    vec![MonitorConfig::default()]
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            monitors: default_monitors(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            vertical_origin: default_origin(),
            accumulate_subpixel: default_false(),
            stock_cursors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            width: default_width(),
            height: default_height(),
            scale_factor: default_scale_factor(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl HostConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// for an empty layout or a degenerate monitor.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: HostConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The monitor layout the simulated platform reports.
    ///
    /// Descriptors are taken as configured; [`HostConfig::from_toml`] has
    /// already validated them.
    pub fn to_layout(&self) -> MonitorLayout {
        MonitorLayout::new(self.monitors.iter().map(MonitorConfig::to_descriptor))
    }

    /// Stock cursors the simulated platform reports.
    pub fn system_cursors(&self) -> Vec<(WellKnownCursor, CursorSnapshot)> {
        if !self.bridge.stock_cursors {
            return Vec::new();
        }
        match stock_arrow() {
            Ok(arrow) => vec![(WellKnownCursor::Arrow, arrow)],
            Err(e) => {
                warn!("stock arrow cursor unavailable: {e}");
                Vec::new()
            }
        }
    }

    pub fn vertical_origin(&self) -> VerticalOrigin {
        self.bridge.vertical_origin.resolve(self.bridge.platform)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            platform: self.bridge.platform,
            vertical_origin: self.vertical_origin(),
            accumulate_subpixel: self.bridge.accumulate_subpixel,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validated_layout(&self.monitors).map(drop)
    }
}

impl MonitorConfig {
    fn to_descriptor(&self) -> MonitorDescriptor {
        MonitorDescriptor {
            index: 0,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            width: self.width,
            height: self.height,
            scale_factor: self.scale_factor,
        }
    }
}

/// Builds a layout from `monitors`, rejecting an empty list and degenerate monitors.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming the first bad monitor.
pub fn validated_layout(monitors: &[MonitorConfig]) -> Result<MonitorLayout, ConfigError> {
    MonitorLayout::try_new(monitors.iter().map(MonitorConfig::to_descriptor))
        .map_err(|e| ConfigError::Invalid(e.to_string()))
}

// ── Stock cursors ─────────────────────────────────────────────────────────────

const ARROW_SIZE: u32 = 16;

/// A 16x16 arrow pointing up-left: black outline, white fill, hotspot at the tip.
///
/// # Errors
///
/// Propagates [`CursorSnapshot::from_rgba`] failures.
pub fn stock_arrow() -> Result<CursorSnapshot, BridgeError> {
    const OUTLINE: [u8; 4] = [0, 0, 0, 255];
    const FILL: [u8; 4] = [255, 255, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    let pixels = (0..ARROW_SIZE)
        .flat_map(|y| (0..ARROW_SIZE).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            if x > y {
                CLEAR
            } else if x == 0 || x == y || y == ARROW_SIZE - 1 {
                OUTLINE
            } else {
                FILL
            }
        })
        .collect();
    CursorSnapshot::from_rgba(ARROW_SIZE, ARROW_SIZE, 0, 0, pixels)
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads `HostConfig` from `path`, returning `HostConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// plus everything [`HostConfig::from_toml`] returns.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => HostConfig::from_toml(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
