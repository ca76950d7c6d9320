//! Line-oriented JSON channel between the remote controller and the bridge.
//!
//! Each input line is one JSON object.  A `{"method", "args"}` object is a
//! command: it yields exactly one response line followed by any
//! notifications the command produced.  An `{"event", "args"}` object stands
//! in for an OS event on the simulated platform (raw mouse delta, local
//! click, cursor-shape change, ...) and yields only notification lines.
//!
//! Blank lines produce no output.  [`serve`] runs the loop over any async
//! reader/writer pair; the binary hands it stdin and stdout.

use input_bridge_core::cursor::{BitmapRepresentation, PixelFormat, RawCursorImage};
use input_bridge_core::protocol::decode_command;
use input_bridge_core::{encode_response, BridgeError, Notification, SharedBridge};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, warn};

use crate::config::{validated_layout, MonitorConfig};

/// A simulated platform event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "event", content = "args", rename_all = "camelCase")]
pub enum SimulatedEvent {
    RawDelta {
        dx: f64,
        dy: f64,
    },
    /// A local button, in the configured platform's native numbering.
    #[serde(rename_all = "camelCase")]
    LocalButton {
        button: u32,
        is_down: bool,
    },
    /// A local key, as a native key code of the configured platform.
    #[serde(rename_all = "camelCase")]
    LocalKey {
        native_code: u32,
        is_down: bool,
    },
    LocalScroll {
        dx: f64,
        dy: f64,
    },
    CursorVisibility {
        visible: bool,
    },
    /// A new cursor shape as straight RGBA8 pixels.
    #[serde(rename_all = "camelCase")]
    CursorImage {
        width: u32,
        height: u32,
        #[serde(default)]
        hotspot_x: u32,
        #[serde(default)]
        hotspot_y: u32,
        #[serde(default = "unit_scale")]
        scale_factor: f64,
        pixels: Vec<u8>,
    },
    MonitorsChanged {
        monitors: Vec<MonitorConfig>,
    },
}

fn unit_scale() -> f64 {
    1.0
}

/// Answers every line from `reader` on `writer` until end of input.
///
/// # Errors
///
/// Returns the first I/O error from either side.
pub async fn serve<R, W>(bridge: &SharedBridge, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        for out in handle_line(bridge, &line) {
            writer.write_all(out.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;
    }
    Ok(())
}

/// Handles one input line and returns the output lines, in order.
pub fn handle_line(bridge: &SharedBridge, line: &str) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return vec![error_line(BridgeError::Decode(e.to_string()))],
    };

    if value.get("event").is_some() {
        return match serde_json::from_value::<SimulatedEvent>(value) {
            Ok(event) => apply_event(bridge, event).iter().filter_map(notification_line).collect(),
            Err(e) => {
                warn!("ignoring malformed simulated event: {e}");
                Vec::new()
            }
        };
    }

    let result = decode_command(&value).and_then(|command| bridge.execute(command));
    let mut lines = vec![encode_response(&result).to_string()];
    if let Ok(reply) = &result {
        lines.extend(reply.notifications.iter().filter_map(notification_line));
    }
    lines
}

/// Feeds a simulated event into the bridge.
pub fn apply_event(bridge: &SharedBridge, event: SimulatedEvent) -> Vec<Notification> {
    match event {
        SimulatedEvent::RawDelta { dx, dy } => bridge.on_raw_delta(dx, dy).into_iter().collect(),
        SimulatedEvent::LocalButton { button, is_down } => {
            bridge.on_local_button(button, is_down).into_iter().collect()
        }
        SimulatedEvent::LocalKey { native_code, is_down } => {
            bridge.on_local_key(native_code, is_down).into_iter().collect()
        }
        SimulatedEvent::LocalScroll { dx, dy } => {
            bridge.on_local_scroll(dx, dy).into_iter().collect()
        }
        SimulatedEvent::CursorVisibility { visible } => bridge.on_cursor_visibility(visible),
        SimulatedEvent::CursorImage {
            width,
            height,
            hotspot_x,
            hotspot_y,
            scale_factor,
            pixels,
        } => {
            let image = RawCursorImage {
                representations: vec![BitmapRepresentation {
                    width,
                    height,
                    format: PixelFormat::Rgba8,
                    bytes: pixels,
                }],
                hotspot_x,
                hotspot_y,
                scale_factor,
            };
            bridge.on_cursor_image(&image).unwrap_or_else(|e| {
                warn!("cursor image rejected: {e}");
                Vec::new()
            })
        }
        SimulatedEvent::MonitorsChanged { monitors } => {
            let applied = validated_layout(&monitors)
                .map_err(|e| e.to_string())
                .and_then(|layout| bridge.on_monitors_changed(layout).map_err(|e| e.to_string()));
            if let Err(e) = applied {
                warn!("monitor change rejected, keeping the previous layout: {e}");
            }
            Vec::new()
        }
    }
}

fn notification_line(note: &Notification) -> Option<String> {
    serde_json::to_string(note)
        .map_err(|e| error!(method = note.method(), "failed to encode notification: {e}"))
        .ok()
}

fn error_line(err: BridgeError) -> String {
    encode_response(&Err(err)).to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
