//! # flexidesk
//!
//! Serial link to FlexiSpot-style standing desk controllers.
//!
//! The controller streams what its seven-segment display shows, wrapped in
//! `0x9b`-delimited frames. This crate resynchronizes that byte stream,
//! classifies each frame and decodes display digits into a height in
//! centimeters. It also sends the fixed 8-byte movement and preset commands.
//!
//! ## Architecture
//!
//! - **Telemetry** (pure, synchronous): [`TelemetrySession`] turns arbitrary
//!   chunks into [`DeskEvent`]s
//! - **Link** (async): [`DeskClient`] drives a session from any
//!   `AsyncRead + AsyncWrite`, typically a serial port via [`transport`]
//!
//! ## Example
//!
//! ```
//! use flexidesk::{DeskEvent, TelemetrySession};
//!
//! let mut session = TelemetrySession::new();
//! let events = session.push(&[0x9b, 0x07, 0x12, 0x06, 0x3f, 0x66, 0x63, 0xe5, 0x9d, 0x9b]);
//!
//! assert_eq!(events[0].height_cm(), Some(104.0));
//! ```

pub mod codec;
pub mod error;
pub mod output;
pub mod protocol;
pub mod telemetry;
pub mod transport;
pub mod writer;

mod client;

pub use client::{ClientBuilder, DeskClient, DEFAULT_EVENT_CAPACITY, DEFAULT_POLL_INTERVAL};
pub use error::{DeskError, Result};
pub use protocol::DeskCommand;
pub use telemetry::{DeskEvent, TelemetrySession};
