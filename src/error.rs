//! Error types for flexidesk.
//!
//! Only the outer layers (serial port, command writer, CLI) can fail.
//! Telemetry decoding absorbs malformed input and never returns an error.

use thiserror::Error;

/// Main error type for all flexidesk operations.
#[derive(Debug, Error)]
pub enum DeskError {
    /// I/O error while reading from or writing to the desk link.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be enumerated or opened.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// JSON serialization error (CLI output only).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Hex capture could not be parsed.
    #[error("Invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Unknown command name.
    #[error("Unknown desk command: {0}")]
    InvalidCommand(String),

    /// Connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Command queue is full; the link is not draining.
    #[error("Command queue full")]
    QueueFull,

    /// A background task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A tokio runtime is required but none is running.
    #[error("No tokio runtime available")]
    NoRuntime,
}

/// Result type alias using DeskError.
pub type Result<T> = std::result::Result<T, DeskError>;
