//! Message classification.
//!
//! Raw bytes are inspected exactly once here and turned into a [`Message`];
//! everything downstream matches on the variant.

use bytes::Bytes;

use super::event::{DeskEvent, HeightEncoding};
use crate::codec::height::{assemble_framed, assemble_short_form};
use crate::protocol::{
    Frame, FRAMED_DIGITS, HEIGHT_LENGTH, HEIGHT_TYPE, MIN_HEIGHT_FRAME_LEN, MIN_SHORT_FORM_LEN,
    MIN_STATUS_FRAME_LEN, SHORT_FORM_DIGITS, STATUS_LENGTH, STATUS_TYPE,
};

/// A classified telemetry message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Canonical height frame: four display bytes.
    FramedHeight([u8; FRAMED_DIGITS]),
    /// Unframed short-form height: three display bytes.
    ShortFormHeight([u8; SHORT_FORM_DIGITS]),
    /// Status frame; the two bytes are passed on undecoded.
    Status {
        /// First status byte.
        value1: u8,
        /// Second status byte.
        value2: u8,
    },
    /// Any other frame.
    Unknown {
        /// The frame's length field.
        length_field: u8,
        /// The frame's type byte.
        type_byte: Option<u8>,
        /// Bytes between the type byte and the trailer.
        payload: Bytes,
    },
}

impl Message {
    /// Turn the message into the event reported to callers.
    ///
    /// Height messages whose digits cannot be assembled produce no event.
    pub fn into_event(self) -> Option<DeskEvent> {
        match self {
            Message::FramedHeight(digits) => {
                assemble_framed(&digits).map(|cm| DeskEvent::height(cm, HeightEncoding::Framed))
            }
            Message::ShortFormHeight(digits) => assemble_short_form(&digits)
                .map(|cm| DeskEvent::height(cm, HeightEncoding::ShortForm)),
            Message::Status { value1, value2 } => Some(DeskEvent::Status { value1, value2 }),
            Message::Unknown {
                length_field,
                type_byte,
                payload,
            } => Some(DeskEvent::Unknown {
                length_field,
                type_byte,
                payload,
            }),
        }
    }
}

/// Classify a frame cut by the scanner.
///
/// # Example
///
/// ```
/// use flexidesk::protocol::Frame;
/// use flexidesk::telemetry::{classify_frame, Message};
///
/// let frame = Frame::from_slice(&[0x9b, 0x07, 0x12, 0x06, 0x3f, 0x66, 0x63, 0xe5, 0x9d, 0x9b]);
/// assert_eq!(classify_frame(&frame), Message::FramedHeight([0x06, 0x3f, 0x66, 0x63]));
/// ```
pub fn classify_frame(frame: &Frame) -> Message {
    let m = frame.as_bytes();

    match m {
        [_, HEIGHT_LENGTH, HEIGHT_TYPE, d1, d2, d3, d4, ..] if m.len() >= MIN_HEIGHT_FRAME_LEN => {
            Message::FramedHeight([*d1, *d2, *d3, *d4])
        }
        [_, STATUS_LENGTH, STATUS_TYPE, value1, value2, ..] if m.len() >= MIN_STATUS_FRAME_LEN => {
            Message::Status {
                value1: *value1,
                value2: *value2,
            }
        }
        _ => Message::Unknown {
            length_field: frame.length_field(),
            type_byte: frame.type_byte(),
            payload: frame.payload_bytes(),
        },
    }
}

/// Classify bytes dropped in front of a sync marker.
///
/// Only the short-form height layout is recognized; anything else is `None`.
pub fn classify_orphan(bytes: &[u8]) -> Option<Message> {
    match bytes {
        [HEIGHT_LENGTH, HEIGHT_TYPE, d1, d2, d3, ..] if bytes.len() >= MIN_SHORT_FORM_LEN => {
            Some(Message::ShortFormHeight([*d1, *d2, *d3]))
        }
        _ => None,
    }
}
