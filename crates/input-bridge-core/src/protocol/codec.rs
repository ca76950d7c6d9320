//! Binary codec for cursor image payloads.
//!
//! Wire format:
//! ```text
//! [tag:1][width:4][height:4][hotspot_x:4][hotspot_y:4][checksum:4][rgba:N]
//! ```
//! Header size: 21 bytes. All multi-byte integers are little-endian and
//! `N == width * height * 4`.  The checksum covers the pixel block only.

use thiserror::Error;

use crate::cursor::{rgba_len, CursorSnapshot};

/// Leading byte of every cursor image payload.
pub const CURSOR_PAYLOAD_TAG: u8 = 9;

/// Size of the fixed header preceding the pixel block.
pub const CURSOR_HEADER_SIZE: usize = 21;

const CHECKSUM_SEED: u32 = 1_315_423_911;

/// Errors that can occur while decoding a cursor payload.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// The byte slice is shorter than the minimum required length.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The first byte is not [`CURSOR_PAYLOAD_TAG`].
    #[error("unexpected payload tag: 0x{0:02X}")]
    UnexpectedTag(u8),

    /// The pixel block length does not match the declared dimensions.
    #[error("pixel length mismatch: header declares {declared} bytes, available is {available}")]
    PixelLengthMismatch { declared: usize, available: usize },

    /// The declared dimensions describe more bytes than can be addressed.
    #[error("declared dimensions {width}x{height} overflow the pixel block size")]
    DimensionOverflow { width: u32, height: u32 },

    /// The stored checksum does not match the pixels.
    #[error("checksum mismatch: header says 0x{declared:08X}, pixels hash to 0x{computed:08X}")]
    ChecksumMismatch { declared: u32, computed: u32 },
}

/// A decoded cursor payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorPayload {
    pub width: u32,
    pub height: u32,
    pub hotspot_x: u32,
    pub hotspot_y: u32,
    pub checksum: u32,
    pub pixels: Vec<u8>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a cursor snapshot into a tagged payload record.
///
/// # Examples
///
/// ```rust
/// use input_bridge_core::cursor::CursorSnapshot;
/// use input_bridge_core::protocol::codec::{decode_cursor_payload, encode_cursor_payload};
///
/// let snap = CursorSnapshot::from_rgba(1, 1, 0, 0, vec![255, 0, 0, 255]).unwrap();
/// let bytes = encode_cursor_payload(&snap);
/// let decoded = decode_cursor_payload(&bytes).unwrap();
/// assert_eq!(decoded.pixels, snap.pixels());
/// ```
pub fn encode_cursor_payload(snapshot: &CursorSnapshot) -> Vec<u8> {
    let pixels = snapshot.pixels();
    let (hotspot_x, hotspot_y) = snapshot.hotspot();

    let mut buf = Vec::with_capacity(CURSOR_HEADER_SIZE + pixels.len());
    buf.push(CURSOR_PAYLOAD_TAG);
    buf.extend_from_slice(&snapshot.width().to_le_bytes());
    buf.extend_from_slice(&snapshot.height().to_le_bytes());
    buf.extend_from_slice(&hotspot_x.to_le_bytes());
    buf.extend_from_slice(&hotspot_y.to_le_bytes());
    buf.extend_from_slice(&pixel_checksum(pixels).to_le_bytes());
    buf.extend_from_slice(pixels);
    buf
}

/// Decodes and validates a cursor payload record.
///
/// # Errors
///
/// Returns [`CodecError`] on a wrong tag, a truncated header, a pixel block
/// that does not match the declared size, or a checksum mismatch.
pub fn decode_cursor_payload(bytes: &[u8]) -> Result<CursorPayload, CodecError> {
    require_len(bytes, CURSOR_HEADER_SIZE)?;
    if bytes[0] != CURSOR_PAYLOAD_TAG {
        return Err(CodecError::UnexpectedTag(bytes[0]));
    }

    let width = read_u32(bytes, 1)?;
    let height = read_u32(bytes, 5)?;
    let hotspot_x = read_u32(bytes, 9)?;
    let hotspot_y = read_u32(bytes, 13)?;
    let checksum = read_u32(bytes, 17)?;

    let pixels = &bytes[CURSOR_HEADER_SIZE..];
    let declared = rgba_len(width, height).ok_or(CodecError::DimensionOverflow { width, height })?;
    if pixels.len() != declared {
        return Err(CodecError::PixelLengthMismatch {
            declared,
            available: pixels.len(),
        });
    }

    let computed = pixel_checksum(pixels);
    if computed != checksum {
        return Err(CodecError::ChecksumMismatch {
            declared: checksum,
            computed,
        });
    }

    Ok(CursorPayload {
        width,
        height,
        hotspot_x,
        hotspot_y,
        checksum,
        pixels: pixels.to_vec(),
    })
}

/// 31-bit checksum over `pixels` read as little-endian `u32` words.
///
/// A trailing partial word is ignored; RGBA8 data never has one.
pub fn pixel_checksum(pixels: &[u8]) -> u32 {
    let hash = pixels.chunks_exact(4).fold(CHECKSUM_SEED, |h, word| {
        let px = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        h ^ (h << 5).wrapping_add(px).wrapping_add(h >> 2)
    });
    hash & 0x7FFF_FFFF
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_len(buf: &[u8], needed: usize) -> Result<(), CodecError> {
    if buf.len() < needed {
        Err(CodecError::InsufficientData {
            needed,
            available: buf.len(),
        })
    } else {
        Ok(())
    }
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, CodecError> {
    require_len(buf, offset + 4)?;
    Ok(u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_2x1() -> CursorSnapshot {
        CursorSnapshot::from_rgba(2, 1, 1, 0, vec![1, 0, 0, 0, 2, 0, 0, 0]).unwrap()
    }

    // ── Layout ────────────────────────────────────────────────────────────────

    #[test]
    fn test_header_fields_are_little_endian_after_tag() {
        // Arrange
        let snap = snapshot_2x1();

        // Act
        let bytes = encode_cursor_payload(&snap);

        // Assert
        assert_eq!(bytes[0], CURSOR_PAYLOAD_TAG);
        assert_eq!(&bytes[1..5], &2u32.to_le_bytes());
        assert_eq!(&bytes[5..9], &1u32.to_le_bytes());
        assert_eq!(&bytes[9..13], &1u32.to_le_bytes());
        assert_eq!(&bytes[13..17], &0u32.to_le_bytes());
        assert_eq!(bytes.len(), CURSOR_HEADER_SIZE + 8);
        assert_eq!(&bytes[CURSOR_HEADER_SIZE..], snap.pixels());
    }

    #[test]
    fn test_stored_checksum_matches_pixel_checksum() {
        let snap = snapshot_2x1();
        let bytes = encode_cursor_payload(&snap);
        let stored = u32::from_le_bytes([bytes[17], bytes[18], bytes[19], bytes[20]]);
        assert_eq!(stored, pixel_checksum(snap.pixels()));
    }

    // ── Checksum ──────────────────────────────────────────────────────────────

    #[test]
    fn test_checksum_of_empty_block_is_masked_seed() {
        assert_eq!(pixel_checksum(&[]), CHECKSUM_SEED & 0x7FFF_FFFF);
    }

    #[test]
    fn test_checksum_matches_hand_computed_value() {
        // One word of 1: h = seed ^ ((seed << 5) + 1 + (seed >> 2))
        let seed = CHECKSUM_SEED;
        let expected = (seed ^ (seed << 5).wrapping_add(1).wrapping_add(seed >> 2)) & 0x7FFF_FFFF;
        assert_eq!(pixel_checksum(&[1, 0, 0, 0]), expected);
    }

    #[test]
    fn test_checksum_always_clears_top_bit() {
        let pixels: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(pixel_checksum(&pixels) & 0x8000_0000, 0);
    }

    // ── Error conditions ──────────────────────────────────────────────────────

    #[test]
    fn test_decode_rejects_wrong_tag() {
        let mut bytes = encode_cursor_payload(&snapshot_2x1());
        bytes[0] = 7;
        assert_eq!(decode_cursor_payload(&bytes), Err(CodecError::UnexpectedTag(7)));
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        let bytes = encode_cursor_payload(&snapshot_2x1());
        assert_eq!(
            decode_cursor_payload(&bytes[..10]),
            Err(CodecError::InsufficientData {
                needed: CURSOR_HEADER_SIZE,
                available: 10
            })
        );
    }

    #[test]
    fn test_decode_rejects_short_pixel_block() {
        let bytes = encode_cursor_payload(&snapshot_2x1());
        let result = decode_cursor_payload(&bytes[..bytes.len() - 4]);
        assert_eq!(
            result,
            Err(CodecError::PixelLengthMismatch {
                declared: 8,
                available: 4
            })
        );
    }

    #[test]
    fn test_decode_rejects_dimensions_that_overflow() {
        // Arrange: a valid record with both dimensions rewritten to u32::MAX
        let mut bytes = encode_cursor_payload(&snapshot_2x1());
        bytes[1..5].copy_from_slice(&u32::MAX.to_le_bytes());
        bytes[5..9].copy_from_slice(&u32::MAX.to_le_bytes());

        // Act
        let result = decode_cursor_payload(&bytes);

        // Assert
        assert_eq!(
            result,
            Err(CodecError::DimensionOverflow {
                width: u32::MAX,
                height: u32::MAX
            })
        );
    }

    #[test]
    fn test_decode_rejects_corrupted_pixels() {
        let mut bytes = encode_cursor_payload(&snapshot_2x1());
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            decode_cursor_payload(&bytes),
            Err(CodecError::ChecksumMismatch { .. })
        ));
    }
}
