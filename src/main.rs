//! flexidesk CLI entry point.

use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flexidesk::output::{write_event, write_stdout_line};
use flexidesk::telemetry::SessionConfig;
use flexidesk::transport::{self, SerialConfig, DEFAULT_BAUD_RATE};
use flexidesk::{DeskClient, DeskCommand, TelemetrySession};

#[derive(Debug, Parser)]
#[command(name = "flexidesk", version, about = "Talk to a standing desk controller over serial")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List serial ports
    Ports,

    /// Connect and print every event the desk reports
    Monitor {
        /// Serial port (e.g. /dev/ttyUSB0, COM3)
        #[arg(long)]
        port: String,

        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,

        /// Height poll interval in milliseconds, 0 disables polling
        #[arg(long, default_value_t = 2000)]
        poll_ms: u64,

        /// Do not wake the display on connect
        #[arg(long)]
        no_wake: bool,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Also print dropped byte spans
        #[arg(long)]
        diagnostics: bool,
    },

    /// Send one command (wake-up, up, down, preset-1 .. preset-4)
    Send {
        #[arg(long)]
        port: String,

        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,

        command: DeskCommand,
    },

    /// Decode a captured byte sequence offline
    Decode {
        /// Feed the capture one byte per chunk
        #[arg(long)]
        byte_at_a_time: bool,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        diagnostics: bool,

        /// Hex bytes, e.g. `9b 07 12 06 3f 66 63 e5 9d`
        #[arg(required = true, value_name = "HEX")]
        capture: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> flexidesk::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match Cli::parse().command {
        Command::Ports => {
            for name in transport::available_ports()? {
                write_stdout_line(&name)?;
            }
        }
        Command::Monitor {
            port,
            baud,
            poll_ms,
            no_wake,
            json,
            diagnostics,
        } => {
            let stream = transport::connect(&SerialConfig::new(port).baud_rate(baud))?;
            let poll_interval = (poll_ms > 0).then(|| Duration::from_millis(poll_ms));

            let mut client = DeskClient::builder()
                .diagnostics(diagnostics)
                .poll_interval(poll_interval)
                .wake_on_start(!no_wake)
                .start(stream)
                .await?;

            while let Some(event) = client.next_event().await {
                write_event(&event, json)?;
            }
            info!("link closed");
            client.wait_for_shutdown().await?;
        }
        Command::Send {
            port,
            baud,
            command,
        } => {
            let mut port = transport::open(&SerialConfig::new(port).baud_rate(baud))?;
            port.write_all(command.as_bytes())?;
            port.flush()?;
            info!(%command, "command sent");
        }
        Command::Decode {
            byte_at_a_time,
            json,
            diagnostics,
            capture,
        } => {
            let digits: String = capture.concat().split_whitespace().collect();
            let bytes = hex::decode(digits)?;

            let mut session = TelemetrySession::with_config(SessionConfig {
                emit_diagnostics: diagnostics,
                ..SessionConfig::default()
            });

            let chunk_size = if byte_at_a_time { 1 } else { bytes.len().max(1) };
            for chunk in bytes.chunks(chunk_size) {
                for event in session.push(chunk) {
                    write_event(&event, json)?;
                }
            }

            if session.buffered() > 0 {
                info!(len = session.buffered(), state = ?session.state(), "capture ends mid-frame");
            }
        }
    }

    Ok(())
}
