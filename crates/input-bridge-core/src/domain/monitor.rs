//! Monitor descriptors and the ordered monitor layout.
//!
//! All descriptors live in one canonical pixel space whose origin is the
//! top-left corner of the reference monitor (index 0) and whose Y axis grows
//! downwards.  Platforms with a bottom-left native convention normalise their
//! monitor frames into this space before handing them over; the
//! [`CoordinateMapper`](super::mapper::CoordinateMapper) flips back when
//! producing injection coordinates.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// A position in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicalPoint {
    pub x: f64,
    pub y: f64,
}

impl PhysicalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One display within the virtual desktop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorDescriptor {
    /// Position within the layout; stable for the session.
    pub index: usize,
    /// X of the top-left corner (may be negative for monitors left of the reference).
    pub origin_x: i32,
    /// Y of the top-left corner (may be negative for monitors above the reference).
    pub origin_y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Backing scale factor (physical pixels per logical point).
    pub scale_factor: f64,
}

impl MonitorDescriptor {
    /// Rightmost X coordinate (exclusive).
    pub fn right(&self) -> i64 {
        i64::from(self.origin_x) + i64::from(self.width)
    }

    /// Bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> i64 {
        i64::from(self.origin_y) + i64::from(self.height)
    }

    /// Returns `true` if `point` lies within this monitor (right/bottom edges exclusive).
    pub fn contains(&self, point: PhysicalPoint) -> bool {
        point.x >= f64::from(self.origin_x)
            && point.x < self.right() as f64
            && point.y >= f64::from(self.origin_y)
            && point.y < self.bottom() as f64
    }

    /// Checks that the descriptor spans a usable area.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidLayout`] for a zero dimension, a
    /// dimension beyond `i32::MAX`, or a scale factor that is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<(), BridgeError> {
        let invalid = |reason: String| {
            BridgeError::InvalidLayout(format!("monitor {}: {reason}", self.index))
        };
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!("zero dimension {}x{}", self.width, self.height)));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(invalid(format!("oversized dimension {}x{}", self.width, self.height)));
        }
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(invalid(format!("scale factor {}", self.scale_factor)));
        }
        Ok(())
    }
}

/// A monitor-relative position expressed as fractions of the monitor size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorPosition {
    #[serde(rename = "monitorIndex")]
    pub monitor_index: usize,
    #[serde(rename = "x")]
    pub x_frac: f64,
    #[serde(rename = "y")]
    pub y_frac: f64,
}

/// Ordered snapshot of the current monitor configuration.
///
/// Replaced wholesale whenever the platform reports a configuration change;
/// nothing in the core mutates an existing layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonitorLayout {
    monitors: Vec<MonitorDescriptor>,
}

impl MonitorLayout {
    /// Builds a layout, renumbering `index` to match each descriptor's position.
    pub fn new(monitors: impl IntoIterator<Item = MonitorDescriptor>) -> Self {
        let monitors = monitors
            .into_iter()
            .enumerate()
            .map(|(index, m)| MonitorDescriptor { index, ..m })
            .collect();
        Self { monitors }
    }

    /// Builds a layout like [`new`](Self::new), rejecting an empty list and
    /// degenerate descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidLayout`] naming the first bad monitor.
    pub fn try_new(
        monitors: impl IntoIterator<Item = MonitorDescriptor>,
    ) -> Result<Self, BridgeError> {
        let layout = Self::new(monitors);
        if layout.is_empty() {
            return Err(BridgeError::InvalidLayout("no monitors".to_string()));
        }
        for m in layout.iter() {
            m.validate()?;
        }
        Ok(layout)
    }

    /// A single monitor at the origin with scale factor 1.0.
    pub fn single(width: u32, height: u32) -> Self {
        Self::new([MonitorDescriptor {
            index: 0,
            origin_x: 0,
            origin_y: 0,
            width,
            height,
            scale_factor: 1.0,
        }])
    }

    /// Number of monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if no monitors are attached.
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Monitor at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&MonitorDescriptor> {
        self.monitors.get(index)
    }

    /// Monitor at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidMonitorIndex`] when `index` is outside the layout.
    pub fn require(&self, index: usize) -> Result<&MonitorDescriptor, BridgeError> {
        self.get(index).ok_or(BridgeError::InvalidMonitorIndex {
            index,
            count: self.len(),
        })
    }

    /// The reference monitor (index 0).
    pub fn reference(&self) -> Option<&MonitorDescriptor> {
        self.monitors.first()
    }

    /// Iterates over the monitors in index order.
    pub fn iter(&self) -> impl Iterator<Item = &MonitorDescriptor> {
        self.monitors.iter()
    }

    /// Finds the monitor containing `point` and the point's fractional position on it.
    ///
    /// Points outside every monitor resolve to the nearest monitor by
    /// centre distance, with fractions left unclamped.
    pub fn locate(&self, point: PhysicalPoint) -> Option<MonitorPosition> {
        let monitor = self.monitors.iter().find(|m| m.contains(point)).or_else(|| {
            self.monitors.iter().min_by(|a, b| {
                centre_distance(a, point).total_cmp(&centre_distance(b, point))
            })
        })?;

        Some(MonitorPosition {
            monitor_index: monitor.index,
            x_frac: (point.x - f64::from(monitor.origin_x)) / f64::from(monitor.width.max(1)),
            y_frac: (point.y - f64::from(monitor.origin_y)) / f64::from(monitor.height.max(1)),
        })
    }
}

fn centre_distance(m: &MonitorDescriptor, p: PhysicalPoint) -> f64 {
    let cx = f64::from(m.origin_x) + f64::from(m.width) / 2.0;
    let cy = f64::from(m.origin_y) + f64::from(m.height) / 2.0;
    (cx - p.x).powi(2) + (cy - p.y).powi(2)
}
