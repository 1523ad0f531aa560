//! Telemetry module - turning received bytes into desk events.
//!
//! Provides:
//! - [`TelemetrySession`] - owns the receive buffer, yields events per chunk
//! - [`Message`] - one-shot classification of a frame or orphan span
//! - [`DeskEvent`] - what callers receive

mod event;
mod message;
mod session;

pub use event::{DeskEvent, DiscardReason, HeightEncoding, LengthUnit};
pub use message::{classify_frame, classify_orphan, Message};
pub use session::{SessionConfig, TelemetrySession};
