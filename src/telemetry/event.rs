//! Events reported to the caller.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// Unit of a height reading. The desk only ever reports centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthUnit {
    /// Centimeters.
    #[serde(rename = "cm")]
    Centimeters,
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Centimeters => f.write_str("cm"),
        }
    }
}

/// Which height encoding a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightEncoding {
    /// Four display bytes inside a `0x9b` frame.
    Framed,
    /// Three display bytes found in front of a sync marker.
    ShortForm,
}

/// Why bytes were thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// The buffer held no sync marker at all.
    NoSyncMarker,
    /// Bytes in front of a sync marker.
    Orphan,
    /// The session's buffer bound was exceeded.
    Overflow,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiscardReason::NoSyncMarker => "no sync marker",
            DiscardReason::Orphan => "orphan bytes before sync marker",
            DiscardReason::Overflow => "buffer bound exceeded",
        })
    }
}

/// Something the desk reported, or a diagnostic about the byte stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeskEvent {
    /// The height shown on the display.
    Height {
        /// Height value.
        value: f64,
        /// Always centimeters.
        unit: LengthUnit,
        /// Encoding the value was assembled from.
        encoding: HeightEncoding,
    },
    /// A status report; the bytes are not interpreted.
    Status {
        /// First status byte.
        value1: u8,
        /// Second status byte.
        value2: u8,
    },
    /// A well-framed message of an unrecognized type.
    Unknown {
        /// The frame's length field.
        length_field: u8,
        /// The frame's type byte.
        type_byte: Option<u8>,
        /// Bytes between the type byte and the trailer.
        payload: Bytes,
    },
    /// Bytes dropped while resynchronizing. Only emitted with diagnostics on.
    Discarded {
        /// Why they were dropped.
        reason: DiscardReason,
        /// How many bytes were dropped.
        len: usize,
    },
}

impl DeskEvent {
    /// A height event in centimeters.
    pub fn height(value: f64, encoding: HeightEncoding) -> Self {
        DeskEvent::Height {
            value,
            unit: LengthUnit::Centimeters,
            encoding,
        }
    }

    /// The height in centimeters, for height events.
    pub fn height_cm(&self) -> Option<f64> {
        match self {
            DeskEvent::Height { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Whether this is a diagnostic rather than desk telemetry.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, DeskEvent::Discarded { .. })
    }
}

impl fmt::Display for DeskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeskEvent::Height {
                value,
                unit,
                encoding,
            } => write!(f, "height {value} {unit} ({encoding:?})"),
            DeskEvent::Status { value1, value2 } => {
                write!(f, "status {value1:#04x} {value2:#04x}")
            }
            DeskEvent::Unknown {
                length_field,
                type_byte,
                payload,
            } => {
                write!(f, "unknown length={length_field:#04x} type=")?;
                match type_byte {
                    Some(t) => write!(f, "{t:#04x}")?,
                    None => f.write_str("n/a")?,
                }
                write!(f, " payload={}", hex::encode(payload))
            }
            DeskEvent::Discarded { reason, len } => write!(f, "discarded {len} bytes ({reason})"),
        }
    }
}
