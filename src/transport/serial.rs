//! Serial port access.
//!
//! The desk controller speaks 9600 baud, 8 data bits, 1 stop bit, no parity
//! and no flow control. `serialport` is blocking, so [`bridge`] pumps it onto
//! an in-memory tokio duplex; everything above this module only sees
//! `AsyncRead + AsyncWrite`.
//!
//! # Example
//!
//! ```ignore
//! use flexidesk::transport::{connect, SerialConfig};
//!
//! let stream = connect(&SerialConfig::new("/dev/ttyUSB0"))?;
//! let client = flexidesk::DeskClient::builder().start(stream).await?;
//! ```

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::{DeskError, Result};

/// Baud rate of the desk controller.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Read timeout of the blocking port; bounds how long shutdown can lag.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Buffer size of the in-memory duplex between the port and the client.
pub const DEFAULT_BRIDGE_CAPACITY: usize = 1024;

/// Size of one blocking read from the port.
const READ_CHUNK: usize = 256;

/// How to reach the desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path or name (`/dev/ttyUSB0`, `COM3`).
    pub port_name: String,
    /// Line speed.
    pub baud_rate: u32,
    /// Blocking read timeout.
    pub timeout: Duration,
    /// Duplex buffer size.
    pub bridge_capacity: usize,
}

impl SerialConfig {
    /// Default settings for the given port.
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            bridge_capacity: DEFAULT_BRIDGE_CAPACITY,
        }
    }

    /// Override the baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Override the blocking read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Names of the serial ports present on this machine.
pub fn available_ports() -> Result<Vec<String>> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}

/// Open the port with the desk's line settings.
pub fn open(config: &SerialConfig) -> Result<Box<dyn SerialPort>> {
    let port = serialport::new(&config.port_name, config.baud_rate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(config.timeout)
        .open()?;

    info!(port = %config.port_name, baud = config.baud_rate, "serial port opened");
    Ok(port)
}

/// Open the port and bridge it onto an async stream.
///
/// Must be called from within a tokio runtime.
pub fn connect(config: &SerialConfig) -> Result<DuplexStream> {
    bridge(open(config)?, config.bridge_capacity)
}

/// Pump a blocking port through an in-memory duplex.
///
/// A dedicated thread copies port reads into the duplex; a tokio task copies
/// duplex writes to the port on the blocking pool. Dropping the returned
/// stream stops both within one read timeout. A port read error ends the
/// stream with EOF.
pub fn bridge(port: Box<dyn SerialPort>, capacity: usize) -> Result<DuplexStream> {
    let runtime = Handle::try_current().map_err(|_| DeskError::NoRuntime)?;

    let (near, far) = tokio::io::duplex(capacity);
    let (mut from_client, mut to_client) = tokio::io::split(far);

    let mut reader = port.try_clone()?;
    let mut writer = port;
    let closed = Arc::new(AtomicBool::new(false));

    let reader_closed = closed.clone();
    std::thread::Builder::new()
        .name("flexidesk-serial-rx".to_string())
        .spawn(move || {
            let mut buf = [0u8; READ_CHUNK];
            while !reader_closed.load(Ordering::Acquire) {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if runtime.block_on(to_client.write_all(&buf[..n])).is_err() {
                            break;
                        }
                    }
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                        ) => {}
                    Err(e) => {
                        warn!(error = %e, "serial read failed");
                        break;
                    }
                }
            }
            if let Err(e) = runtime.block_on(to_client.shutdown()) {
                debug!(error = %e, "bridge shutdown failed");
            }
            debug!("serial reader stopped");
        })?;

    tokio::spawn(async move {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let n = match from_client.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };

            let data = buf[..n].to_vec();
            let written = tokio::task::spawn_blocking(move || {
                writer.write_all(&data)?;
                writer.flush()?;
                Ok::<_, io::Error>(writer)
            })
            .await;

            match written {
                Ok(Ok(port)) => writer = port,
                Ok(Err(e)) => {
                    warn!(error = %e, "serial write failed");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "serial write task failed");
                    break;
                }
            }
        }
        closed.store(true, Ordering::Release);
        debug!("serial writer stopped");
    });

    Ok(near)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");

        assert_eq!(config.port_name, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout, Duration::from_millis(100));
        assert_eq!(config.bridge_capacity, DEFAULT_BRIDGE_CAPACITY);
    }

    #[test]
    fn test_config_overrides() {
        let config = SerialConfig::new("COM3")
            .baud_rate(115_200)
            .timeout(Duration::from_millis(20));

        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout, Duration::from_millis(20));
    }

    #[test]
    fn test_open_missing_port_fails() {
        let config = SerialConfig::new("/dev/flexidesk-no-such-port");
        assert!(matches!(open(&config), Err(DeskError::Serial(_))));
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_bridge_over_pty() {
        use serialport::TTYPort;

        let (mut desk, port) = TTYPort::pair().unwrap();
        let mut stream = bridge(Box::new(port), DEFAULT_BRIDGE_CAPACITY).unwrap();

        // Desk to client
        desk.write_all(&[0x9b, 0x04, 0x11, 0x01, 0x02, 0x03, 0x9d]).unwrap();
        let mut status = [0u8; 7];
        tokio::time::timeout(Duration::from_secs(2), stream.read_exact(&mut status))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status, [0x9b, 0x04, 0x11, 0x01, 0x02, 0x03, 0x9d]);

        // Client to desk
        stream.write_all(&[0x9b, 0x06, 0x02, 0x00, 0x00, 0x6c, 0xa1, 0x9d]).await.unwrap();
        let received = tokio::task::spawn_blocking(move || {
            let mut buf = [0u8; 8];
            desk.read_exact(&mut buf).map(|()| buf)
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(received, [0x9b, 0x06, 0x02, 0x00, 0x00, 0x6c, 0xa1, 0x9d]);

        drop(stream);
    }
}
