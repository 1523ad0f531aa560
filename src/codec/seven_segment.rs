//! Seven-segment display decoding.
//!
//! The controller reports what its display shows, one byte per digit
//! position. Bits 6..0 are the segments `g f e d c b a`; bit 7 is the
//! decimal point lit after that position.
//!
//! ```text
//!    a
//!  f   b
//!    g
//!  e   c
//!    d   .
//! ```
//!
//! # Example
//!
//! ```
//! use flexidesk::codec::seven_segment;
//!
//! let reading = seven_segment::decode(0x66);
//! assert_eq!(reading.digit, Some(4));
//! assert!(!reading.decimal_point);
//!
//! let reading = seven_segment::decode(0x66 | 0x80);
//! assert_eq!(reading.digit, Some(4));
//! assert!(reading.decimal_point);
//! ```

/// Bit carrying the decimal point.
pub const DECIMAL_POINT: u8 = 0b1000_0000;

/// Bits carrying the segment pattern.
pub const SEGMENT_MASK: u8 = 0b0111_1111;

/// Segment pattern of each digit, indexed by the digit value.
pub const SEGMENT_TABLE: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

/// One decoded display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitReading {
    /// The digit shown, or `None` for a blank or unrecognized pattern.
    pub digit: Option<u8>,
    /// Whether the decimal point after this position is lit.
    pub decimal_point: bool,
}

impl DigitReading {
    /// A dark display position.
    pub const BLANK: DigitReading = DigitReading {
        digit: None,
        decimal_point: false,
    };
}

/// Decode one display byte.
///
/// `0x00` is a blank position. Any pattern outside [`SEGMENT_TABLE`] also
/// decodes to `digit: None`; callers cannot tell the two apart.
pub fn decode(byte: u8) -> DigitReading {
    if byte == 0x00 {
        return DigitReading::BLANK;
    }

    let segments = byte & SEGMENT_MASK;
    let digit = SEGMENT_TABLE
        .iter()
        .position(|&pattern| pattern == segments)
        .map(|d| d as u8);

    DigitReading {
        digit,
        decimal_point: byte & DECIMAL_POINT != 0,
    }
}

/// The display byte for `digit`, optionally with the decimal point lit.
///
/// Returns `None` for values above 9.
pub fn encode(digit: u8, decimal_point: bool) -> Option<u8> {
    let pattern = *SEGMENT_TABLE.get(digit as usize)?;
    Some(if decimal_point {
        pattern | DECIMAL_POINT
    } else {
        pattern
    })
}
