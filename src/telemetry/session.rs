//! Telemetry parsing session.
//!
//! A [`TelemetrySession`] owns the receive buffer for one connection. The
//! transport owner pushes every chunk it reads and gets back the events that
//! chunk completed; chunk boundaries carry no meaning.
//!
//! Nothing here fails. Noise, truncated frames and undecodable digits only
//! ever show up as missing events (or as `Discarded` diagnostics when asked
//! for). The trailer byte of a frame is taken positionally and never checked,
//! so a corrupted but well-framed message decodes to a wrong value.
//!
//! # Example
//!
//! ```
//! use flexidesk::telemetry::{DeskEvent, TelemetrySession};
//!
//! let mut session = TelemetrySession::new();
//!
//! assert!(session.push(&[0x9b, 0x07, 0x12, 0x06, 0x3f]).is_empty());
//! let events = session.push(&[0x66, 0x63, 0xe5, 0x9d, 0x9b]);
//!
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].height_cm(), Some(104.0));
//! ```

use tracing::{debug, trace, warn};

use super::event::{DeskEvent, DiscardReason};
use super::message::{classify_frame, classify_orphan, Message};
use crate::protocol::{FrameBuffer, ScanState, Segment, DEFAULT_MAX_BUFFERED_BYTES};

/// Configuration for a telemetry session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bytes retained between chunks before the buffer is dropped.
    pub max_buffered_bytes: usize,
    /// Emit `Discarded` events for dropped spans.
    pub emit_diagnostics: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_buffered_bytes: DEFAULT_MAX_BUFFERED_BYTES,
            emit_diagnostics: false,
        }
    }
}

/// Parser state for one connection.
#[derive(Debug, Default)]
pub struct TelemetrySession {
    buffer: FrameBuffer,
    config: SessionConfig,
}

impl TelemetrySession {
    /// Create a session with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with custom settings.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            buffer: FrameBuffer::new(),
            config,
        }
    }

    /// The session's settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Feed one chunk and collect the events it completed, in wire order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<DeskEvent> {
        trace!(len = chunk.len(), bytes = %hex::encode(chunk), "chunk received");

        let mut events = Vec::new();

        for segment in self.buffer.push(chunk) {
            match segment {
                Segment::Frame(frame) => {
                    let message = classify_frame(&frame);
                    debug!(frame = %hex::encode(frame.as_bytes()), ?message, "frame extracted");

                    if let Some(event) = message.into_event() {
                        events.push(event);
                    } else {
                        debug!("height frame without readable digits");
                    }
                }
                Segment::Orphan(bytes) => {
                    if let Some(event) = classify_orphan(&bytes).and_then(Message::into_event) {
                        events.push(event);
                    }
                    debug!(len = bytes.len(), bytes = %hex::encode(&bytes), "orphan bytes dropped");
                    self.diagnostic(&mut events, DiscardReason::Orphan, bytes.len());
                }
                Segment::Flushed(len) => {
                    warn!(len, "no sync marker in buffer, dropped");
                    self.diagnostic(&mut events, DiscardReason::NoSyncMarker, len);
                }
            }
        }

        if self.buffer.len() > self.config.max_buffered_bytes {
            let len = self.buffer.len();
            warn!(
                len,
                max = self.config.max_buffered_bytes,
                "receive buffer over bound, dropped"
            );
            self.buffer.clear();
            self.diagnostic(&mut events, DiscardReason::Overflow, len);
        }

        events
    }

    /// Drop any partial frame. Call whenever the connection starts over.
    pub fn reset(&mut self) {
        if !self.buffer.is_empty() {
            debug!(len = self.buffer.len(), "session reset, partial data dropped");
        }
        self.buffer.clear();
    }

    /// Number of bytes waiting for more input.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Where scanning will resume.
    pub fn state(&self) -> ScanState {
        self.buffer.state()
    }

    fn diagnostic(&self, events: &mut Vec<DeskEvent>, reason: DiscardReason, len: usize) {
        if self.config.emit_diagnostics {
            events.push(DeskEvent::Discarded { reason, len });
        }
    }
}
