//! fifoctl - Interactive driver for the bytefifo device pool.
//!
//! Stands in for the kernel registration layer: initializes a registry,
//! maps line commands from stdin onto device operations, and prints the
//! results.

use std::time::Duration;

use anyhow::{Context, Result};
use bytefifo_device::{ControlReply, ControlRequest, DeviceRegistry, RegistryConfig};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Interactive driver for a pool of pseudo FIFO devices.
#[derive(Parser, Debug)]
#[command(name = "fifoctl")]
#[command(about = "Interactive driver for a pool of pseudo FIFO devices")]
struct Args {
    /// Number of device instances in the pool
    #[arg(short = 'n', long, default_value_t = 4)]
    devices: usize,

    /// Per-device buffer capacity in bytes
    #[arg(short, long, default_value_t = 32)]
    capacity: usize,

    /// Drain period in milliseconds
    #[arg(long, default_value_t = 1000)]
    period_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut registry = DeviceRegistry::initialize(RegistryConfig {
        pool_size: args.devices,
        capacity: args.capacity,
        drain_period: Duration::from_millis(args.period_ms),
    })
    .context("failed to initialize device registry")?;

    println!(
        "{} devices ready (capacity {} bytes, drain period {} ms)",
        registry.len(),
        args.capacity,
        args.period_ms
    );
    println!(
        "commands: open|close|info|clear|start|stop <dev> | write <dev> <text> | \
         read <dev> <n> | resize <dev> <capacity> | quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        if let Err(e) = handle_line(&registry, line).await {
            println!("error: {e}");
        }
    }

    registry.teardown().await;
    Ok(())
}

/// Parses one command line and applies it to the addressed device.
async fn handle_line(registry: &DeviceRegistry, line: &str) -> Result<()> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().context("empty command")?;
    let index: usize = parts
        .next()
        .context("missing device index")?
        .parse()
        .context("device index must be a number")?;
    let rest = parts.collect::<Vec<_>>().join(" ");

    let dev = registry.lookup(index)?;

    match cmd {
        "open" => {
            dev.open();
            println!("dev{index}: opened");
        }
        "close" => {
            dev.close();
            println!("dev{index}: closed");
        }
        "write" => {
            let written = dev.write(rest.as_bytes());
            println!("dev{index}: wrote {written} of {} bytes", rest.len());
        }
        "read" => {
            let count: usize = rest.parse().context("read takes a byte count")?;
            let mut buf = vec![0u8; count];
            let read = dev.read(&mut buf);
            println!(
                "dev{index}: read {read} bytes: {:?}",
                String::from_utf8_lossy(&buf[..read])
            );
        }
        // Control operations go through the wire-format parser, like an
        // external control request would.
        "info" | "clear" | "start" | "stop" | "resize" => {
            let (op, arg) = match cmd {
                "info" => ("get_info", None),
                "clear" => ("clear", None),
                "start" => ("start_drain", None),
                "stop" => ("stop_drain", None),
                "resize" => (
                    "resize",
                    Some(rest.parse().context("resize takes a capacity")?),
                ),
                _ => unreachable!(),
            };
            let request = ControlRequest::parse(op, arg)?;
            match dev.control(request).await? {
                ControlReply::Done => println!("dev{index}: {op} ok"),
                ControlReply::Info(info) => {
                    println!("dev{index}: {}", serde_json::to_string(&info)?);
                }
            }
        }
        other => anyhow::bail!("unknown command: {other}"),
    }

    Ok(())
}
