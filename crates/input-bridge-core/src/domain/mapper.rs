//! Conversion from logical positions and deltas to physical injection points.
//!
//! Inputs arrive either as monitor-relative fractions in `[0,1]×[0,1]`
//! (absolute moves) or as pixel deltas (relative moves).  The mapper resolves
//! them against a [`MonitorLayout`] snapshot, converts the result into the
//! platform's native vertical convention, and tags it with the [`MotionKind`]
//! that keeps an in-progress drag alive.
//!
//! # Bottom-left platforms
//!
//! Monitor descriptors are top-left based.  On a bottom-left platform the
//! mapper first locates the monitor's bottom edge in native space,
//!
//! ```text
//! bottom = reference_height - (origin_y + height)
//! ```
//!
//! where `reference_height` is the height of monitor 0, and then measures the
//! fraction upwards from there: `y = bottom + (1 - y_frac) * height`.  Using the
//! reference monitor's height rather than the target's own is what keeps
//! monitors of different resolutions aligned when they are stacked unevenly.

use crate::domain::button::{MotionKind, PointerButton};
use crate::domain::monitor::{MonitorDescriptor, MonitorLayout, PhysicalPoint};
use crate::error::BridgeError;
use crate::platform::PlatformError;

/// Read-only pointer state queried from the platform on every mapping call.
pub trait PointerQuery {
    /// The button currently held down, if any.
    fn pressed_button(&self) -> Option<PointerButton>;

    /// Current pointer position in canonical (top-left) space.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the position cannot be read.
    fn cursor_position(&self) -> Result<PhysicalPoint, PlatformError>;
}

/// Vertical axis convention of the platform's injection API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalOrigin {
    /// Y grows downwards from the top-left of the reference monitor.
    #[default]
    TopLeft,
    /// Y grows upwards from the bottom-left of the reference monitor.
    BottomLeft,
}

/// A computed injection point plus the motion kind to inject it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedMotion {
    pub point: PhysicalPoint,
    pub kind: MotionKind,
}

/// Fraction of a pixel carried between relative moves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SubPixelRemainder {
    x: f64,
    y: f64,
}

impl SubPixelRemainder {
    /// Adds the carried fraction to `(dx, dy)` and returns the whole-pixel part.
    fn take_whole(&mut self, dx: f64, dy: f64) -> (f64, f64) {
        let tx = dx + self.x;
        let ty = dy + self.y;
        let (wx, wy) = (tx.trunc(), ty.trunc());
        self.x = tx - wx;
        self.y = ty - wy;
        (wx, wy)
    }
}

/// Maps logical coordinates onto physical monitors.
#[derive(Debug, Clone, Default)]
pub struct CoordinateMapper {
    vertical: VerticalOrigin,
    accumulate: bool,
    remainder: SubPixelRemainder,
}

impl CoordinateMapper {
    pub fn new(vertical: VerticalOrigin) -> Self {
        Self {
            vertical,
            accumulate: false,
            remainder: SubPixelRemainder::default(),
        }
    }

    /// Enables sub-pixel accumulation for relative moves.
    ///
    /// Relative results are then whole pixels and the dropped fraction is
    /// added to the next delta instead of being lost to truncation.
    pub fn with_accumulator(mut self) -> Self {
        self.accumulate = true;
        self
    }

    pub fn vertical_origin(&self) -> VerticalOrigin {
        self.vertical
    }

    /// Discards any carried sub-pixel fraction.
    pub fn reset_accumulator(&mut self) {
        self.remainder = SubPixelRemainder::default();
    }

    /// Maps a monitor-relative fraction to a physical point.
    ///
    /// `(0, 0)` is the monitor's top-left corner and `(1, 1)` its bottom-right.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidMonitorIndex`] if `monitor_index` is not in `layout`.
    pub fn map_absolute<P: PointerQuery + ?Sized>(
        &self,
        x_frac: f64,
        y_frac: f64,
        monitor_index: usize,
        layout: &MonitorLayout,
        pointer: &P,
    ) -> Result<MappedMotion, BridgeError> {
        let monitor = layout.require(monitor_index)?;
        let x = f64::from(monitor.origin_x) + x_frac * f64::from(monitor.width);
        let y = match self.vertical {
            VerticalOrigin::TopLeft => {
                f64::from(monitor.origin_y) + y_frac * f64::from(monitor.height)
            }
            VerticalOrigin::BottomLeft => {
                let bottom = native_bottom(monitor, reference_height(layout));
                bottom + (1.0 - y_frac) * f64::from(monitor.height)
            }
        };

        Ok(MappedMotion {
            point: PhysicalPoint::new(x, y),
            kind: MotionKind::for_pressed(pointer.pressed_button()),
        })
    }

    /// Moves the current pointer position by `(dx, dy)`, saturating at the
    /// edges of monitor `monitor_index`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidMonitorIndex`] for an unknown monitor and
    /// [`BridgeError::Platform`] if the pointer position cannot be read.  The
    /// sub-pixel remainder is left untouched on error.
    pub fn map_relative<P: PointerQuery + ?Sized>(
        &mut self,
        dx: f64,
        dy: f64,
        monitor_index: usize,
        layout: &MonitorLayout,
        pointer: &P,
    ) -> Result<MappedMotion, BridgeError> {
        let monitor = layout.require(monitor_index)?;
        let current = pointer.cursor_position()?;

        let (dx, dy) = if self.accumulate {
            self.remainder.take_whole(dx, dy)
        } else {
            (dx, dy)
        };

        // Bounds are widened to i64 first, so min <= max holds for any descriptor.
        let x = (current.x + dx).clamp(f64::from(monitor.origin_x), monitor.right() as f64);
        let y = (current.y + dy).clamp(f64::from(monitor.origin_y), monitor.bottom() as f64);

        Ok(MappedMotion {
            point: self.to_native(PhysicalPoint::new(x, y), layout),
            kind: MotionKind::for_pressed(pointer.pressed_button()),
        })
    }

    /// Converts a canonical (top-left) point into the native vertical convention.
    pub fn to_native(&self, point: PhysicalPoint, layout: &MonitorLayout) -> PhysicalPoint {
        match self.vertical {
            VerticalOrigin::TopLeft => point,
            VerticalOrigin::BottomLeft => {
                PhysicalPoint::new(point.x, reference_height(layout) - point.y)
            }
        }
    }
}

fn reference_height(layout: &MonitorLayout) -> f64 {
    layout.reference().map_or(0.0, |m| f64::from(m.height))
}

fn native_bottom(monitor: &MonitorDescriptor, reference_height: f64) -> f64 {
    reference_height - monitor.bottom() as f64
}
