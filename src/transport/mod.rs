//! Transport module - getting bytes to and from the desk.
//!
//! Provides:
//! - serial port enumeration and opening with the desk's line settings
//! - a bridge from the blocking port onto a tokio `DuplexStream`

mod serial;

pub use serial::{
    available_ports, bridge, connect, open, SerialConfig, DEFAULT_BAUD_RATE,
    DEFAULT_BRIDGE_CAPACITY, DEFAULT_TIMEOUT,
};
