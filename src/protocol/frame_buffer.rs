//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management. Each push appends
//! the chunk and then re-runs the scan loop:
//!
//! - below [`MIN_SCAN_LEN`] bytes nothing is attempted
//! - no sync marker anywhere: the whole buffer is dropped
//! - bytes in front of the marker are split off as an orphan span
//! - a frame is cut once `length + 3` bytes are buffered
//!
//! The scan state is derived from the buffer contents rather than stored, so
//! the loop can be re-entered on every chunk without bookkeeping.
//!
//! # Example
//!
//! ```
//! use flexidesk::protocol::{FrameBuffer, Segment};
//!
//! let mut buffer = FrameBuffer::new();
//!
//! // Half a status frame: nothing yet
//! assert!(buffer.push(&[0x9b, 0x04, 0x11]).is_empty());
//!
//! let segments = buffer.push(&[0x01, 0x02, 0x03, 0x9d]);
//! assert!(matches!(&segments[..], [Segment::Frame(frame)] if frame.len() == 7));
//! ```

use bytes::{Bytes, BytesMut};

use super::wire_format::{frame_total_len, MIN_SCAN_LEN, SYNC_MARKER};
use super::Frame;

/// Initial capacity of the accumulation buffer.
const INITIAL_CAPACITY: usize = 512;

/// Where the scan loop would resume on the next chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Buffer does not start with a sync marker (or is empty).
    AwaitingSync,
    /// Sync marker buffered, length byte missing.
    AwaitingLength,
    /// Sync marker and length buffered, waiting until `total_len` bytes are present.
    AwaitingBody {
        /// Bytes the frame will occupy on the wire.
        total_len: usize,
    },
}

/// One unit produced by a scan, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A complete frame.
    Frame(Frame),
    /// Bytes that preceded a sync marker and were dropped from the buffer.
    Orphan(Bytes),
    /// The whole buffer was dropped because it held no sync marker.
    Flushed(usize),
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// All data is stored in a single `BytesMut` buffer; extracted frames and
/// orphan spans are split off the front without copying.
#[derive(Debug)]
pub struct FrameBuffer {
    /// Accumulated bytes from transport reads.
    buffer: BytesMut,
}

impl FrameBuffer {
    /// Create a new, empty frame buffer.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create a new frame buffer with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Push data into the buffer and extract everything that is complete.
    ///
    /// This is the main API for processing incoming data from the transport.
    /// Partial frames stay buffered for the next push.
    pub fn push(&mut self, data: &[u8]) -> Vec<Segment> {
        self.extend(data);
        self.scan()
    }

    /// Append data to the buffer without scanning.
    ///
    /// Prefer using `push()` which does extend + scan in one call.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Run the scan loop over the buffered bytes.
    pub fn scan(&mut self) -> Vec<Segment> {
        let mut segments = Vec::new();

        while self.buffer.len() >= MIN_SCAN_LEN {
            let Some(start) = self.buffer.iter().position(|&b| b == SYNC_MARKER) else {
                let dropped = self.buffer.len();
                self.buffer.clear();
                segments.push(Segment::Flushed(dropped));
                break;
            };

            if start > 0 {
                let orphan = self.buffer.split_to(start).freeze();
                segments.push(Segment::Orphan(orphan));
            }

            // Length byte not here yet
            if self.buffer.len() < 2 {
                break;
            }

            let total_len = frame_total_len(self.buffer[1]);
            if self.buffer.len() < total_len {
                break;
            }

            let frame = self.buffer.split_to(total_len).freeze();
            segments.push(Segment::Frame(Frame::new(frame)));
        }

        segments
    }

    /// Get the current scan state.
    pub fn state(&self) -> ScanState {
        match (self.buffer.first(), self.buffer.get(1)) {
            (Some(&SYNC_MARKER), None) => ScanState::AwaitingLength,
            (Some(&SYNC_MARKER), Some(&length)) => ScanState::AwaitingBody {
                total_len: frame_total_len(length),
            },
            _ => ScanState::AwaitingSync,
        }
    }

    /// Get the buffered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The height frame captured from a real controller.
    const CAPTURE: [u8; 9] = [0x9b, 0x07, 0x12, 0x06, 0x3f, 0x66, 0x63, 0xe5, 0x9d];

    fn status_frame(value1: u8, value2: u8) -> Vec<u8> {
        vec![0x9b, 0x04, 0x11, value1, value2, 0x00, 0x9d]
    }

    fn frames(segments: &[Segment]) -> Vec<&Frame> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Frame(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_complete_frame() {
        let mut buffer = FrameBuffer::new();

        let segments = buffer.push(&status_frame(1, 2));

        assert_eq!(segments.len(), 1);
        let frame = frames(&segments)[0];
        assert_eq!(frame.type_byte(), Some(0x11));
        assert_eq!(frame.payload(), &[1, 2, 0]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_one_push() {
        let mut buffer = FrameBuffer::new();

        let mut combined = status_frame(1, 1);
        combined.extend(status_frame(2, 2));
        combined.extend(status_frame(3, 3));

        let segments = buffer.push(&combined);
        let frames = frames(&segments);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].byte(3), Some(1));
        assert_eq!(frames[1].byte(3), Some(2));
        assert_eq!(frames[2].byte(3), Some(3));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_below_min_scan_len_is_untouched() {
        let mut buffer = FrameBuffer::new();

        // Garbage without a marker, but too short to be scanned
        let segments = buffer.push(&[0x01, 0x02, 0x03, 0x04, 0x05]);

        assert!(segments.is_empty());
        assert_eq!(buffer.as_bytes(), &[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(buffer.state(), ScanState::AwaitingSync);
    }

    #[test]
    fn test_no_marker_flushes_whole_buffer() {
        let mut buffer = FrameBuffer::new();

        let segments = buffer.push(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);

        assert_eq!(segments, vec![Segment::Flushed(7)]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_orphan_split_before_marker() {
        let mut buffer = FrameBuffer::new();

        let mut data = vec![0xaa, 0xbb];
        data.extend(status_frame(5, 6));

        let segments = buffer.push(&data);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::Orphan(Bytes::from_static(&[0xaa, 0xbb])));
        assert!(matches!(&segments[1], Segment::Frame(f) if f.byte(3) == Some(5)));
    }

    #[test]
    fn test_orphan_dropped_even_when_frame_incomplete() {
        let mut buffer = FrameBuffer::new();

        let segments = buffer.push(&[0x01, 0x02, 0x03, 0x04, 0x9b, 0x07]);

        assert_eq!(segments.len(), 1);
        assert!(matches!(&segments[0], Segment::Orphan(b) if b.len() == 4));
        assert_eq!(buffer.as_bytes(), &[0x9b, 0x07]);
        assert_eq!(buffer.state(), ScanState::AwaitingBody { total_len: 10 });
    }

    #[test]
    fn test_marker_as_last_byte_awaits_length() {
        let mut buffer = FrameBuffer::new();

        let segments = buffer.push(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x9b]);

        assert_eq!(segments.len(), 1);
        assert_eq!(buffer.state(), ScanState::AwaitingLength);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_capture_needs_one_byte_beyond_trailer() {
        let mut buffer = FrameBuffer::new();

        // len 0x07 means 10 bytes, the capture only has 9
        assert!(buffer.push(&CAPTURE).is_empty());
        assert_eq!(buffer.len(), 9);
        assert_eq!(buffer.state(), ScanState::AwaitingBody { total_len: 10 });

        // The next byte (here the start of the following frame) completes it
        let segments = buffer.push(&[0x9b]);
        let frames = frames(&segments);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].len(), 10);
        assert_eq!(frames[0].trailer(), 0x9b);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fragmented_frame() {
        let mut buffer = FrameBuffer::new();
        let frame_bytes = status_frame(7, 8);

        assert!(buffer.push(&frame_bytes[..3]).is_empty());
        assert_eq!(buffer.state(), ScanState::AwaitingBody { total_len: 7 });

        let segments = buffer.push(&frame_bytes[3..]);
        assert_eq!(frames(&segments).len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_short_frame_extracted_below_min_scan_len() {
        let mut buffer = FrameBuffer::new();

        // After the orphan is split, 4 bytes remain: a complete len-0 frame
        // plus one extra byte.
        let segments = buffer.push(&[0x01, 0x02, 0x9b, 0x00, 0x42, 0x55]);

        assert_eq!(segments.len(), 2);
        assert!(matches!(&segments[1], Segment::Frame(f) if f.as_bytes() == [0x9b, 0x00, 0x42]));
        assert_eq!(buffer.as_bytes(), &[0x55]);
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buffer = FrameBuffer::new();

        buffer.push(&status_frame(1, 2)[..4]);
        assert_eq!(buffer.state(), ScanState::AwaitingBody { total_len: 7 });

        buffer.clear();

        assert_eq!(buffer.state(), ScanState::AwaitingSync);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_mixed_complete_and_partial() {
        let mut buffer = FrameBuffer::new();

        let mut data = status_frame(1, 1);
        data.extend_from_slice(&status_frame(2, 2)[..5]);

        let segments = buffer.push(&data);
        assert_eq!(frames(&segments).len(), 1);
        assert_eq!(buffer.len(), 5);

        let segments = buffer.push(&status_frame(2, 2)[5..]);
        let frames = frames(&segments);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].byte(3), Some(2));
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut buffer = FrameBuffer::new();
        let mut data = CAPTURE.to_vec();
        data.extend(status_frame(9, 9));

        let mut all = Vec::new();
        for byte in &data {
            all.extend(buffer.push(&[*byte]));
        }

        // The height frame swallows the status frame's marker, so the
        // remainder has no marker left and is flushed.
        assert_eq!(all.len(), 2);
        assert!(matches!(&all[0], Segment::Frame(f) if f.len() == 10));
        assert!(matches!(&all[1], Segment::Flushed(6)));
        assert!(buffer.is_empty());
    }
}
