//! Codec module - display digit decoding and height assembly.
//!
//! - [`seven_segment`] - one display byte to a digit and decimal-point flag
//! - [`height`] - digit sequences to a height in centimeters
//!
//! # Design
//!
//! Both are plain functions over byte arrays with no state, shared by the
//! telemetry session and the CLI so there is exactly one decode table.
//!
//! # Example
//!
//! ```
//! use flexidesk::codec::{height, seven_segment};
//!
//! assert_eq!(seven_segment::decode(0x3f).digit, Some(0));
//! assert_eq!(height::assemble_framed(&[0x06, 0x3f, 0x66, 0x63]), Some(104.0));
//! ```

pub mod height;
pub mod seven_segment;

pub use seven_segment::DigitReading;
