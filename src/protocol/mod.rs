//! Protocol module - wire format, framing, and commands.
//!
//! This module implements the serial link layer:
//! - wire constants and the `length + 3` frame size rule
//! - frame buffer that resynchronizes on the `0x9b` sync marker
//! - frame struct with positional accessors
//! - the literal commands sent to the desk

mod command;
mod frame;
mod frame_buffer;
mod wire_format;

pub use command::{DeskCommand, COMMAND_LEN};
pub use frame::Frame;
pub use frame_buffer::{FrameBuffer, ScanState, Segment};
pub use wire_format::{
    frame_total_len, DEFAULT_MAX_BUFFERED_BYTES, FRAMED_DIGITS, FRAME_OVERHEAD, HEIGHT_LENGTH,
    HEIGHT_TYPE, MIN_HEIGHT_FRAME_LEN, MIN_SCAN_LEN, MIN_SHORT_FORM_LEN, MIN_STATUS_FRAME_LEN,
    SHORT_FORM_DIGITS, STATUS_LENGTH, STATUS_TYPE, SYNC_MARKER,
};
