//! Frame struct with positional accessors.
//!
//! A frame is the exact span the scanner cut off the wire, sync marker
//! first and trailer last. Uses `bytes::Bytes` so the payload slice handed
//! to events shares memory with the receive buffer.
//!
//! # Example
//!
//! ```
//! use flexidesk::protocol::Frame;
//!
//! let frame = Frame::from_slice(&[0x9b, 0x04, 0x11, 0x01, 0x02, 0x03, 0x9d]);
//!
//! assert_eq!(frame.length_field(), 0x04);
//! assert_eq!(frame.type_byte(), Some(0x11));
//! assert_eq!(frame.payload(), &[0x01, 0x02, 0x03]);
//! assert_eq!(frame.trailer(), 0x9d);
//! ```

use bytes::Bytes;

use super::wire_format::SYNC_MARKER;

/// Offset of the first byte after `[sync][len][type]`.
const PAYLOAD_OFFSET: usize = 3;

/// A complete frame as cut from the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap an extracted span.
    ///
    /// The scanner only builds frames of at least three bytes starting with
    /// the sync marker.
    pub fn new(bytes: Bytes) -> Self {
        debug_assert!(bytes.len() >= PAYLOAD_OFFSET);
        debug_assert_eq!(bytes.first(), Some(&SYNC_MARKER));
        Self { bytes }
    }

    /// Create a frame from raw bytes (copies data).
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(bytes))
    }

    /// All bytes of the frame, marker through trailer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes the frame occupied on the wire.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for scanner output; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at `index`, if the frame is long enough.
    #[inline]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// The length field (`m[1]`).
    #[inline]
    pub fn length_field(&self) -> u8 {
        self.bytes.get(1).copied().unwrap_or_default()
    }

    /// The type byte (`m[2]`).
    #[inline]
    pub fn type_byte(&self) -> Option<u8> {
        self.byte(2)
    }

    /// The middle slice between the type byte and the trailer.
    ///
    /// Empty when the frame has nothing between them.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        self.payload_bytes_range()
            .map_or(&[][..], |range| &self.bytes[range])
    }

    /// The middle slice as `Bytes` (cheap, zero-copy).
    pub fn payload_bytes(&self) -> Bytes {
        self.payload_bytes_range()
            .map_or_else(Bytes::new, |range| self.bytes.slice(range))
    }

    /// The final byte. Never validated.
    #[inline]
    pub fn trailer(&self) -> u8 {
        self.bytes.last().copied().unwrap_or_default()
    }

    fn payload_bytes_range(&self) -> Option<std::ops::Range<usize>> {
        let end = self.bytes.len().checked_sub(1)?;
        (end > PAYLOAD_OFFSET).then_some(PAYLOAD_OFFSET..end)
    }
}
