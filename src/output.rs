//! Line-oriented stdout for the CLI.
//!
//! - **stdout**: one event per line, text or JSON
//! - **stderr**: logs (see `RUST_LOG`)
//!
//! Lines always end in a bare `\n` and are flushed immediately so the output
//! can be piped into another process while the desk is moving.

use std::io::Write;

use crate::telemetry::DeskEvent;

/// Write a line to stdout and flush.
pub fn write_stdout_line(line: &str) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(line.as_bytes())?;
    handle.write_all(b"\n")?;
    handle.flush()?;
    Ok(())
}

/// Write a value to stdout as a single JSON line.
pub fn write_stdout_json<T: serde::Serialize>(value: &T) -> crate::error::Result<()> {
    let json = serde_json::to_string(value)?;
    write_stdout_line(&json)?;
    Ok(())
}

/// Print an event in the requested format.
pub fn write_event(event: &DeskEvent, json: bool) -> crate::error::Result<()> {
    if json {
        write_stdout_json(event)
    } else {
        write_stdout_line(&event.to_string())?;
        Ok(())
    }
}
