//! Height assembly from decoded display digits.
//!
//! Two encodings reach us and they disagree on where the decimal point goes:
//!
//! - **Framed** (4 bytes, inside a `0x9b` frame): blank and unknown positions
//!   are skipped, the remaining digits are concatenated, and a decimal point
//!   is inserted after the last digit whose byte had its point lit.
//! - **Short form** (3 bytes, no sync marker): all three positions must be
//!   digits, and if any point is lit the value is divided by ten once,
//!   whatever its position.
//!
//! Both rules are reproduced as observed. With the point after the first of
//! `1 0 4` the framed rule gives 1.04 cm and the short-form rule 10.4 cm.

use super::seven_segment::{decode, DigitReading};
use crate::protocol::{FRAMED_DIGITS, SHORT_FORM_DIGITS};

/// Assemble a height in centimeters from a framed 4-byte payload.
///
/// Returns `None` when no position holds a digit.
///
/// # Example
///
/// ```
/// use flexidesk::codec::height::assemble_framed;
///
/// assert_eq!(assemble_framed(&[0x06, 0x3f, 0x66, 0x63]), Some(104.0));
/// assert_eq!(assemble_framed(&[0x00, 0x00, 0x00, 0x00]), None);
/// ```
pub fn assemble_framed(payload: &[u8; FRAMED_DIGITS]) -> Option<f64> {
    let mut text = String::with_capacity(FRAMED_DIGITS + 1);
    let mut point_after = None;

    for reading in payload.iter().map(|&byte| decode(byte)) {
        let Some(digit) = reading.digit else {
            continue;
        };
        text.push(char::from(b'0' + digit));
        if reading.decimal_point {
            point_after = Some(text.len());
        }
    }

    if text.is_empty() {
        return None;
    }

    // A point after the final digit changes nothing
    if let Some(at) = point_after.filter(|&at| at < text.len()) {
        text.insert(at, '.');
    }

    text.parse().ok()
}

/// Assemble a height in centimeters from a short-form 3-byte payload.
///
/// Returns `None` unless every position holds a digit.
///
/// # Example
///
/// ```
/// use flexidesk::codec::height::assemble_short_form;
///
/// assert_eq!(assemble_short_form(&[0x06, 0x3f, 0x66]), Some(104.0));
/// assert_eq!(assemble_short_form(&[0x06, 0x3f, 0x63]), None);
/// ```
pub fn assemble_short_form(payload: &[u8; SHORT_FORM_DIGITS]) -> Option<f64> {
    let readings: [DigitReading; SHORT_FORM_DIGITS] = payload.map(decode);

    let mut value = 0u32;
    for reading in &readings {
        value = value * 10 + u32::from(reading.digit?);
    }

    let mut height = f64::from(value);
    if readings.iter().any(|r| r.decimal_point) {
        height /= 10.0;
    }
    Some(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::seven_segment::encode;

    fn digit(d: u8) -> u8 {
        encode(d, false).unwrap()
    }

    fn pointed(d: u8) -> u8 {
        encode(d, true).unwrap()
    }

    #[test]
    fn test_framed_capture_skips_unknown_pattern() {
        assert_eq!(assemble_framed(&[0x06, 0x3f, 0x66, 0x63]), Some(104.0));
    }

    #[test]
    fn test_framed_all_blank_is_invalid() {
        assert_eq!(assemble_framed(&[0x00; 4]), None);
        assert_eq!(assemble_framed(&[0x63, 0x00, 0x63, 0x80]), None);
    }

    #[test]
    fn test_framed_skips_leading_blank() {
        assert_eq!(
            assemble_framed(&[0x00, digit(7), digit(2), digit(5)]),
            Some(725.0)
        );
    }

    #[test]
    fn test_framed_decimal_point_is_positional() {
        assert_eq!(
            assemble_framed(&[digit(1), digit(0), pointed(4), digit(5)]),
            Some(104.5)
        );
        assert_eq!(
            assemble_framed(&[pointed(1), digit(0), digit(4), 0x00]),
            Some(1.04)
        );
    }

    #[test]
    fn test_framed_point_adjusts_for_skipped_positions() {
        // Blank in front: the point belongs after the second kept digit
        assert_eq!(
            assemble_framed(&[0x00, digit(7), pointed(2), digit(5)]),
            Some(72.5)
        );
    }

    #[test]
    fn test_framed_point_on_last_digit_is_ignored() {
        assert_eq!(
            assemble_framed(&[digit(1), digit(0), pointed(4), 0x00]),
            Some(104.0)
        );
    }

    #[test]
    fn test_framed_last_point_wins() {
        assert_eq!(
            assemble_framed(&[pointed(1), pointed(2), digit(3), digit(4)]),
            Some(12.34)
        );
    }

    #[test]
    fn test_framed_point_on_unknown_position_is_lost() {
        assert_eq!(
            assemble_framed(&[digit(1), 0x80 | 0x63, digit(0), digit(4)]),
            Some(104.0)
        );
    }

    #[test]
    fn test_short_form_plain() {
        assert_eq!(assemble_short_form(&[0x06, 0x3f, 0x66]), Some(104.0));
        assert_eq!(
            assemble_short_form(&[digit(0), digit(0), digit(7)]),
            Some(7.0)
        );
    }

    #[test]
    fn test_short_form_rejects_absent_digits() {
        assert_eq!(assemble_short_form(&[0x00, digit(1), digit(2)]), None);
        assert_eq!(assemble_short_form(&[digit(1), 0x63, digit(2)]), None);
    }

    #[test]
    fn test_short_form_divides_once_for_any_point() {
        assert_eq!(
            assemble_short_form(&[digit(1), pointed(0), digit(4)]),
            Some(10.4)
        );
        assert_eq!(
            assemble_short_form(&[pointed(1), pointed(0), pointed(4)]),
            Some(10.4)
        );
    }

    #[test]
    fn test_variants_disagree_on_point_position() {
        let framed = assemble_framed(&[pointed(1), digit(0), digit(4), 0x00]);
        let short = assemble_short_form(&[pointed(1), digit(0), digit(4)]);
        assert_eq!(framed, Some(1.04));
        assert_eq!(short, Some(10.4));

        let framed = assemble_framed(&[digit(1), digit(0), pointed(4), 0x00]);
        let short = assemble_short_form(&[digit(1), digit(0), pointed(4)]);
        assert_eq!(framed, Some(104.0));
        assert_eq!(short, Some(10.4));
    }

    #[test]
    fn test_variants_agree_on_middle_point() {
        let framed = assemble_framed(&[digit(1), pointed(0), digit(4), 0x00]);
        let short = assemble_short_form(&[digit(1), pointed(0), digit(4)]);
        assert_eq!(framed, Some(10.4));
        assert_eq!(short, Some(10.4));
    }
}
