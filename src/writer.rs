//! Dedicated writer task for desk commands.
//!
//! Commands from the caller and from the height poller go through one mpsc
//! channel to a single task that owns the write half of the link, so writes
//! never interleave.
//!
//! # Architecture
//!
//! ```text
//! DeskClient::send ─┐
//! Height poller ────┴─► mpsc::Sender<DeskCommand> ─► Writer Task ─► Serial link
//! ```

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{DeskError, Result};
use crate::protocol::{DeskCommand, COMMAND_LEN};

/// Default channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Maximum commands to batch in a single write operation.
const MAX_BATCH_SIZE: usize = 8;

/// Configuration for the writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Channel capacity for the command queue.
    pub channel_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Handle for sending commands to the writer task.
///
/// This is cheaply cloneable and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    tx: mpsc::Sender<DeskCommand>,
}

impl WriterHandle {
    /// Queue a command, waiting for room in the channel.
    pub async fn send(&self, command: DeskCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| DeskError::ConnectionClosed)
    }

    /// Queue a command without waiting.
    ///
    /// Returns `Err(QueueFull)` immediately if the channel is at capacity.
    pub fn try_send(&self, command: DeskCommand) -> Result<()> {
        self.tx.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeskError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DeskError::ConnectionClosed,
        })
    }

    /// Whether the writer task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Spawn the writer task and return a handle for sending commands.
///
/// The task ends cleanly once every handle is dropped, or with an error
/// when a write fails.
pub fn spawn_writer_task<W>(writer: W, config: WriterConfig) -> (WriterHandle, JoinHandle<Result<()>>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let task = tokio::spawn(writer_loop(rx, writer));
    (WriterHandle { tx }, task)
}

/// Main writer loop - receives commands and writes them to the link.
async fn writer_loop<W>(mut rx: mpsc::Receiver<DeskCommand>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut batch = Vec::with_capacity(MAX_BATCH_SIZE * COMMAND_LEN);

    while let Some(first) = rx.recv().await {
        batch.clear();
        batch.extend_from_slice(first.as_bytes());
        debug!(command = %first, "sending command");

        // Collect additional ready commands (non-blocking)
        for _ in 1..MAX_BATCH_SIZE {
            match rx.try_recv() {
                Ok(command) => {
                    debug!(%command, "sending command");
                    batch.extend_from_slice(command.as_bytes());
                }
                Err(_) => break,
            }
        }

        writer.write_all(&batch).await?;
        writer.flush().await?;
    }

    // Channel closed, clean shutdown
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt};

    #[tokio::test]
    async fn test_command_bytes_reach_the_link() {
        let (near, mut far) = duplex(256);
        let (handle, task) = spawn_writer_task(near, WriterConfig::default());

        handle.send(DeskCommand::WakeUp).await.unwrap();

        let mut buf = [0u8; COMMAND_LEN];
        far.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, DeskCommand::WakeUp.as_bytes());

        drop(handle);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_commands_keep_their_order() {
        let (near, mut far) = duplex(256);
        let (handle, task) = spawn_writer_task(near, WriterConfig::default());

        let sequence = [
            DeskCommand::Up,
            DeskCommand::Up,
            DeskCommand::Down,
            DeskCommand::Preset2,
        ];
        for command in sequence {
            handle.send(command).await.unwrap();
        }
        drop(handle);
        task.await.unwrap().unwrap();

        let mut received = Vec::new();
        far.read_to_end(&mut received).await.unwrap();

        let expected: Vec<u8> = sequence
            .iter()
            .flat_map(|c| c.as_bytes().iter().copied())
            .collect();
        assert_eq!(received, expected);
    }

    #[tokio::test]
    async fn test_send_after_link_closed_fails() {
        let (near, far) = duplex(64);
        let (handle, task) = spawn_writer_task(near, WriterConfig::default());
        drop(far);

        // First write hits the closed pipe and ends the task
        handle.send(DeskCommand::Up).await.unwrap();
        assert!(task.await.unwrap().is_err());

        assert!(handle.is_closed());
        assert!(matches!(
            handle.send(DeskCommand::Up).await,
            Err(DeskError::ConnectionClosed)
        ));
        assert!(matches!(
            handle.try_send(DeskCommand::Up),
            Err(DeskError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_default_config() {
        assert_eq!(
            WriterConfig::default().channel_capacity,
            DEFAULT_CHANNEL_CAPACITY
        );
    }
}
