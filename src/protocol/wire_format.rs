//! Wire format constants for the desk serial link.
//!
//! Canonical frame as reported by the controller:
//! ```text
//! ┌──────┬────────┬──────┬─────────────────────┬─────────┐
//! │ Sync │ Length │ Type │ Payload             │ Trailer │
//! │ 0x9b │ 1 byte │ byte │ len - 3 bytes       │ 1 byte  │
//! └──────┴────────┴──────┴─────────────────────┴─────────┘
//! ```
//!
//! The number of bytes taken off the wire for one frame is always
//! `length + FRAME_OVERHEAD`. The trailer is never computed or verified.
//!
//! Short-form height messages carry no sync marker:
//! ```text
//! [0x07][0x12][d1][d2][d3][... at least 3 unexamined bytes]
//! ```

/// Byte that marks the start of every framed message.
pub const SYNC_MARKER: u8 = 0x9b;

/// Bytes a frame occupies on the wire in addition to its length field value
/// (marker, length byte, trailer).
pub const FRAME_OVERHEAD: usize = 3;

/// The scan loop does not attempt an extraction below this many buffered bytes.
pub const MIN_SCAN_LEN: usize = 6;

/// Default bound on bytes a session retains between chunks.
pub const DEFAULT_MAX_BUFFERED_BYTES: usize = 1024;

/// Length field value of a canonical height frame.
pub const HEIGHT_LENGTH: u8 = 0x07;

/// Type byte of a height message (framed and short form).
pub const HEIGHT_TYPE: u8 = 0x12;

/// Length field value of a status frame.
pub const STATUS_LENGTH: u8 = 0x04;

/// Type byte of a status frame.
pub const STATUS_TYPE: u8 = 0x11;

/// Minimum frame size before a frame is treated as a height message.
pub const MIN_HEIGHT_FRAME_LEN: usize = 9;

/// Minimum frame size before a frame is treated as a status message.
pub const MIN_STATUS_FRAME_LEN: usize = 7;

/// Minimum orphan span before it is treated as a short-form height message.
pub const MIN_SHORT_FORM_LEN: usize = 8;

/// Number of seven-segment bytes in a canonical height payload.
pub const FRAMED_DIGITS: usize = 4;

/// Number of seven-segment bytes in a short-form height payload.
pub const SHORT_FORM_DIGITS: usize = 3;

/// Total bytes a frame with the given length field occupies on the wire.
///
/// # Example
///
/// ```
/// use flexidesk::protocol::frame_total_len;
///
/// assert_eq!(frame_total_len(0x07), 10);
/// ```
#[inline]
pub fn frame_total_len(length_field: u8) -> usize {
    length_field as usize + FRAME_OVERHEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_len_adds_overhead() {
        assert_eq!(frame_total_len(0), 3);
        assert_eq!(frame_total_len(HEIGHT_LENGTH), 10);
        assert_eq!(frame_total_len(STATUS_LENGTH), 7);
        assert_eq!(frame_total_len(u8::MAX), 258);
    }

    #[test]
    fn test_minimum_lengths_fit_their_formats() {
        // A canonical height frame must hold sync, len, type and four digits
        assert!(frame_total_len(HEIGHT_LENGTH) >= MIN_HEIGHT_FRAME_LEN);
        assert!(MIN_HEIGHT_FRAME_LEN >= 3 + FRAMED_DIGITS);
        assert_eq!(frame_total_len(STATUS_LENGTH), MIN_STATUS_FRAME_LEN);
        assert!(MIN_SHORT_FORM_LEN >= 2 + SHORT_FORM_DIGITS);
    }
}
