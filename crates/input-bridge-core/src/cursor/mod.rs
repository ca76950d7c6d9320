//! Cursor images: capture, content identity, and deduplication.
//!
//! A platform cursor-shape notification is turned into an immutable
//! [`CursorSnapshot`] by [`CursorSnapshot::capture`].  Capturing hashes every
//! bitmap representation of the image (SHA-256), normalises the primary
//! representation to RGBA8, and resolves the hotspot in device pixels.  The
//! snapshot is then classified by the [`cache::CursorIdentityCache`].
//!
//! Capturing is the only expensive step and touches no shared state, so the
//! session runs it before taking its lock.

pub mod cache;
pub mod well_known;

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::BridgeError;

/// Images larger than this (in either dimension, device pixels) have their
/// hotspot multiplied by the monitor's backing scale factor.
///
/// Small system-sized icons already report their hotspot in device pixels;
/// larger custom images report it in logical points.
pub const HOTSPOT_SCALE_THRESHOLD_PX: u32 = 32;

/// 256-bit digest identifying a cursor image by content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Hashes the concatenation of `parts`.
    pub fn of<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({self})")
    }
}

/// Channel order of a source bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
    Argb8,
}

/// One resolution of a cursor image as delivered by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapRepresentation {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub bytes: Vec<u8>,
}

/// A raw cursor-shape notification, before hashing and normalisation.
///
/// The first representation is the one transmitted; all of them feed the hash.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCursorImage {
    pub representations: Vec<BitmapRepresentation>,
    /// Hotspot as reported by the platform (see [`HOTSPOT_SCALE_THRESHOLD_PX`]).
    pub hotspot_x: u32,
    pub hotspot_y: u32,
    /// Backing scale factor of the monitor the cursor is on.
    pub scale_factor: f64,
}

/// Immutable, hashed cursor image with RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSnapshot {
    content_hash: ContentHash,
    width: u32,
    height: u32,
    hotspot_x: u32,
    hotspot_y: u32,
    pixels: Vec<u8>,
}

impl CursorSnapshot {
    /// Hashes and normalises a raw platform cursor image.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MalformedSnapshot`] when the image has no
    /// representation, a zero dimension, or a byte length that does not match
    /// `width * height * 4`.
    pub fn capture(image: &RawCursorImage) -> Result<Self, BridgeError> {
        let primary = image
            .representations
            .first()
            .ok_or_else(|| BridgeError::MalformedSnapshot("no bitmap representation".to_string()))?;
        for rep in &image.representations {
            validate(rep)?;
        }

        let content_hash =
            ContentHash::of(image.representations.iter().map(|r| r.bytes.as_slice()));
        let (hotspot_x, hotspot_y) = resolve_hotspot(
            image.hotspot_x,
            image.hotspot_y,
            primary.width,
            primary.height,
            image.scale_factor,
        );

        Ok(Self {
            content_hash,
            width: primary.width,
            height: primary.height,
            hotspot_x,
            hotspot_y,
            pixels: normalise_to_rgba(primary.format, &primary.bytes),
        })
    }

    /// Builds a snapshot from a single RGBA8 bitmap whose hotspot is already in device pixels.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MalformedSnapshot`] on a dimension/length mismatch.
    pub fn from_rgba(
        width: u32,
        height: u32,
        hotspot_x: u32,
        hotspot_y: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, BridgeError> {
        let rep = BitmapRepresentation {
            width,
            height,
            format: PixelFormat::Rgba8,
            bytes: pixels,
        };
        validate(&rep)?;
        Ok(Self {
            content_hash: ContentHash::of([rep.bytes.as_slice()]),
            width,
            height,
            hotspot_x,
            hotspot_y,
            pixels: rep.bytes,
        })
    }

    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn hotspot(&self) -> (u32, u32) {
        (self.hotspot_x, self.hotspot_y)
    }

    /// RGBA8 pixel data, row-major, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

fn validate(rep: &BitmapRepresentation) -> Result<(), BridgeError> {
    if rep.width == 0 || rep.height == 0 {
        return Err(BridgeError::MalformedSnapshot(format!(
            "zero-sized bitmap {}x{}",
            rep.width, rep.height
        )));
    }
    let expected = rgba_len(rep.width, rep.height).ok_or_else(|| {
        BridgeError::MalformedSnapshot(format!("{}x{} bitmap is too large", rep.width, rep.height))
    })?;
    if rep.bytes.len() != expected {
        return Err(BridgeError::MalformedSnapshot(format!(
            "{}x{} bitmap needs {expected} bytes, got {}",
            rep.width,
            rep.height,
            rep.bytes.len()
        )));
    }
    Ok(())
}

/// Byte length of a `width` x `height` RGBA8 bitmap, or `None` if it does not
/// fit in `usize`.
pub fn rgba_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(4)
}

/// Scales the hotspot by `scale_factor` only for images above the icon threshold.
pub fn resolve_hotspot(hx: u32, hy: u32, width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    if width.max(height) <= HOTSPOT_SCALE_THRESHOLD_PX || scale_factor <= 0.0 {
        return (hx, hy);
    }
    let scale = |v: u32| (f64::from(v) * scale_factor).round() as u32;
    (scale(hx), scale(hy))
}

fn normalise_to_rgba(format: PixelFormat, bytes: &[u8]) -> Vec<u8> {
    match format {
        PixelFormat::Rgba8 => bytes.to_vec(),
        PixelFormat::Bgra8 => bytes
            .chunks_exact(4)
            .flat_map(|px| [px[2], px[1], px[0], px[3]])
            .collect(),
        PixelFormat::Argb8 => bytes
            .chunks_exact(4)
            .flat_map(|px| [px[1], px[2], px[3], px[0]])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(width: u32, height: u32, format: PixelFormat, fill: [u8; 4]) -> BitmapRepresentation {
        BitmapRepresentation {
            width,
            height,
            format,
            bytes: fill.repeat((width * height) as usize),
        }
    }

    fn image(reps: Vec<BitmapRepresentation>) -> RawCursorImage {
        RawCursorImage {
            representations: reps,
            hotspot_x: 4,
            hotspot_y: 6,
            scale_factor: 2.0,
        }
    }

    #[test]
    fn test_capture_normalises_bgra_to_rgba() {
        // Arrange
        let raw = image(vec![rep(2, 2, PixelFormat::Bgra8, [0x10, 0x20, 0x30, 0xFF])]);

        // Act
        let snap = CursorSnapshot::capture(&raw).unwrap();

        // Assert
        assert_eq!(&snap.pixels()[..4], &[0x30, 0x20, 0x10, 0xFF]);
    }

    #[test]
    fn test_capture_normalises_argb_to_rgba() {
        let raw = image(vec![rep(1, 1, PixelFormat::Argb8, [0x80, 0x01, 0x02, 0x03])]);
        let snap = CursorSnapshot::capture(&raw).unwrap();
        assert_eq!(snap.pixels(), &[0x01, 0x02, 0x03, 0x80]);
    }

    #[test]
    fn test_hash_covers_every_representation() {
        let one = image(vec![rep(2, 2, PixelFormat::Rgba8, [1, 2, 3, 4])]);
        let two = image(vec![
            rep(2, 2, PixelFormat::Rgba8, [1, 2, 3, 4]),
            rep(4, 4, PixelFormat::Rgba8, [1, 2, 3, 4]),
        ]);

        let a = CursorSnapshot::capture(&one).unwrap();
        let b = CursorSnapshot::capture(&two).unwrap();

        assert_ne!(a.content_hash(), b.content_hash());
        assert_eq!(a.pixels(), b.pixels(), "primary representation is transmitted");
    }

    #[test]
    fn test_same_bytes_give_same_hash() {
        let raw = image(vec![rep(3, 3, PixelFormat::Rgba8, [9, 9, 9, 9])]);
        let a = CursorSnapshot::capture(&raw).unwrap();
        let b = CursorSnapshot::capture(&raw).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_capture_rejects_image_without_representations() {
        let result = CursorSnapshot::capture(&image(vec![]));
        assert!(matches!(result, Err(BridgeError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_capture_rejects_truncated_pixel_buffer() {
        let mut bad = rep(4, 4, PixelFormat::Rgba8, [0; 4]);
        bad.bytes.pop();
        let result = CursorSnapshot::capture(&image(vec![bad]));
        assert!(matches!(result, Err(BridgeError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_capture_rejects_zero_sized_bitmap() {
        let result = CursorSnapshot::from_rgba(0, 16, 0, 0, vec![]);
        assert!(matches!(result, Err(BridgeError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_dimensions_overflowing_usize_are_malformed() {
        // Arrange / Act
        let result = CursorSnapshot::from_rgba(u32::MAX, u32::MAX, 0, 0, vec![0; 4]);

        // Assert
        assert!(
            matches!(
                &result,
                Err(BridgeError::MalformedSnapshot(msg)) if msg.contains("too large")
            ),
            "{result:?}"
        );
    }

    #[test]
    fn test_rgba_len_is_four_bytes_per_pixel() {
        assert_eq!(rgba_len(3, 2), Some(24));
        assert_eq!(rgba_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_small_icon_hotspot_is_not_scaled() {
        let raw = image(vec![rep(32, 32, PixelFormat::Rgba8, [0; 4])]);
        let snap = CursorSnapshot::capture(&raw).unwrap();
        assert_eq!(snap.hotspot(), (4, 6));
    }

    #[test]
    fn test_large_image_hotspot_is_scaled_by_backing_factor() {
        let raw = image(vec![rep(64, 64, PixelFormat::Rgba8, [0; 4])]);
        let snap = CursorSnapshot::capture(&raw).unwrap();
        assert_eq!(snap.hotspot(), (8, 12));
    }

    #[test]
    fn test_resolve_hotspot_rounds_fractional_scales() {
        assert_eq!(resolve_hotspot(3, 5, 48, 48, 1.5), (5, 8));
    }

    #[test]
    fn test_content_hash_displays_as_lowercase_hex() {
        let hash = ContentHash::of([b"".as_slice()]);
        assert_eq!(
            hash.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
