//! Client builder and runtime loop.
//!
//! The [`ClientBuilder`] provides a fluent API for configuring the link and
//! building the client. The [`DeskClient`] manages the lifecycle:
//! 1. Split the stream into read and write halves
//! 2. Spawn the command writer task
//! 3. Spawn the read loop feeding a [`TelemetrySession`]
//! 4. Wake the display and poll for height periodically
//!
//! # Example
//!
//! ```ignore
//! use flexidesk::{transport, DeskClient, DeskCommand};
//!
//! #[tokio::main]
//! async fn main() -> flexidesk::Result<()> {
//!     let stream = transport::connect(&transport::SerialConfig::new("/dev/ttyUSB0"))?;
//!     let mut client = DeskClient::builder().start(stream).await?;
//!
//!     client.send(DeskCommand::Preset1).await?;
//!     while let Some(event) = client.next_event().await {
//!         println!("{event}");
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::error::{DeskError, Result};
use crate::protocol::DeskCommand;
use crate::telemetry::{DeskEvent, SessionConfig, TelemetrySession};
use crate::writer::{spawn_writer_task, WriterConfig, WriterHandle};

/// Default interval between height polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default capacity of the event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Size of one read from the link.
const READ_BUFFER_SIZE: usize = 1024;

/// Builder for configuring and creating a desk client.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    session: SessionConfig,
    writer_config: WriterConfig,
    event_capacity: usize,
    poll_interval: Option<Duration>,
    wake_on_start: bool,
}

impl ClientBuilder {
    /// Create a new client builder.
    pub fn new() -> Self {
        Self {
            session: SessionConfig::default(),
            writer_config: WriterConfig::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            poll_interval: Some(DEFAULT_POLL_INTERVAL),
            wake_on_start: true,
        }
    }

    /// Bound on bytes the session keeps between reads.
    ///
    /// Default: 1024
    pub fn max_buffered_bytes(mut self, limit: usize) -> Self {
        self.session.max_buffered_bytes = limit;
        self
    }

    /// Also report dropped byte spans as `Discarded` events.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.session.emit_diagnostics = enabled;
        self
    }

    /// Set the command channel capacity.
    ///
    /// Default: 32
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.writer_config.channel_capacity = capacity;
        self
    }

    /// Set the event channel capacity.
    ///
    /// Events arriving while the channel is full are dropped; height
    /// readings still reach `last_height()` and `height_updates()`.
    /// Default: 64
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Send a wake-up every `interval` so the desk keeps reporting its
    /// height. `None` disables polling.
    ///
    /// Default: 2 seconds
    pub fn poll_interval(mut self, interval: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Send a wake-up as soon as the client starts.
    ///
    /// Default: true
    pub fn wake_on_start(mut self, enabled: bool) -> Self {
        self.wake_on_start = enabled;
        self
    }

    /// Start the client over an already connected stream.
    pub async fn start<S>(self, stream: S) -> Result<DeskClient>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        DeskClient::start(self, stream).await
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running desk client.
///
/// Use `send()` for commands and `next_event()` for telemetry.
///
/// Dropping the client stops its background tasks: no more height polls are
/// sent, and handles from `commands()` start failing with `ConnectionClosed`.
pub struct DeskClient {
    /// Writer handle for sending commands.
    writer: WriterHandle,
    /// Events from the read loop.
    events: mpsc::Receiver<DeskEvent>,
    /// Latest height seen.
    height: watch::Receiver<Option<f64>>,
    /// Read loop task handle.
    read_task: JoinHandle<Result<()>>,
    /// Height poller task handle.
    poll_task: Option<JoinHandle<()>>,
    /// Writer task handle.
    writer_task: JoinHandle<Result<()>>,
}

impl DeskClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    async fn start<S>(config: ClientBuilder, stream: S) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, write_half) = tokio::io::split(stream);

        let (writer, writer_task) = spawn_writer_task(write_half, config.writer_config);

        if config.wake_on_start {
            if let Err(e) = writer.send(DeskCommand::WakeUp).await {
                writer_task.abort();
                return Err(e);
            }
        }

        let (events_tx, events) = mpsc::channel(config.event_capacity);
        let (height_tx, height) = watch::channel(None);
        let session = TelemetrySession::with_config(config.session);

        let read_task = tokio::spawn(async move {
            let result = Self::read_loop(reader, session, events_tx, height_tx).await;
            if let Err(e) = &result {
                warn!(error = %e, "read loop ended");
            }
            result
        });

        let poll_task = config
            .poll_interval
            .map(|interval| tokio::spawn(Self::poll_loop(writer.clone(), interval)));

        info!("desk client started");

        Ok(Self {
            writer,
            events,
            height,
            read_task,
            poll_task,
            writer_task,
        })
    }

    /// Main read loop - reads chunks and forwards decoded events.
    async fn read_loop<R: AsyncRead + Unpin>(
        mut reader: R,
        mut session: TelemetrySession,
        events: mpsc::Sender<DeskEvent>,
        height: watch::Sender<Option<f64>>,
    ) -> Result<()> {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) => {
                    debug!("link closed");
                    session.reset();
                    return Ok(());
                }
                Ok(n) => n,
                Err(e) => {
                    session.reset();
                    return Err(DeskError::Io(e));
                }
            };

            for event in session.push(&buf[..n]) {
                if let Some(cm) = event.height_cm() {
                    height.send_replace(Some(cm));
                }
                match events.try_send(event) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(event)) => {
                        debug!(%event, "event queue full, dropped");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        debug!("event receiver dropped");
                        session.reset();
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Periodic wake-up so the controller keeps reporting height.
    async fn poll_loop(writer: WriterHandle, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match writer.try_send(DeskCommand::WakeUp) {
                Ok(()) => trace!("height poll queued"),
                Err(DeskError::QueueFull) => debug!("command queue full, skipping height poll"),
                Err(_) => return,
            }
        }
    }

    /// Send a command to the desk.
    pub async fn send(&self, command: DeskCommand) -> Result<()> {
        self.writer.send(command).await
    }

    /// A handle for sending commands from other tasks.
    pub fn commands(&self) -> WriterHandle {
        self.writer.clone()
    }

    /// The next event, or `None` once the link has closed.
    pub async fn next_event(&mut self) -> Option<DeskEvent> {
        self.events.recv().await
    }

    /// The most recent height reading, if any.
    pub fn last_height(&self) -> Option<f64> {
        *self.height.borrow()
    }

    /// A receiver notified on every height reading.
    ///
    /// Keeps updating whether or not `next_event()` is drained.
    pub fn height_updates(&self) -> watch::Receiver<Option<f64>> {
        self.height.clone()
    }

    /// Wait until the link closes.
    ///
    /// This consumes the client. Events still queued are dropped.
    pub async fn wait_for_shutdown(mut self) -> Result<()> {
        self.events.close();
        (&mut self.read_task).await?
    }
}

impl Drop for DeskClient {
    fn drop(&mut self) {
        if let Some(task) = &self.poll_task {
            task.abort();
        }
        self.read_task.abort();
        self.writer_task.abort();
    }
}
