//! Exchange server
//!
//! Reads one JSON request per line from stdin and writes one JSON response
//! per line to stdout. All requests go through a single exchange actor.

use clap::Parser;
use exchange::config::EngineConfig;
use exchange::protocol::{self, Response};
use exchange::{actor, Exchange};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

/// Exchange server command-line configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "exchange-server")]
#[command(version)]
#[command(about = "Custodial spot exchange speaking line-delimited JSON on stdin/stdout", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    info!(
        reference = %config.reference_asset.ticker,
        assets = config.assets.len(),
        queue_capacity = config.queue_capacity,
        "configuration loaded"
    );

    let exchange = Exchange::from_config(&config)?;
    let (handle, task) = actor::spawn(exchange, config.queue_capacity);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match protocol::parse_line(&line) {
            Ok(request) => request.dispatch(&handle).await,
            Err(response) => response,
        };
        let mut encoded = serde_json::to_string(&response)
            .unwrap_or_else(|err| {
                error!(error = %err, "failed to encode response");
                let fallback = Response::error("INTERNAL", err.to_string());
                serde_json::to_string(&fallback).unwrap_or_default()
            });
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    drop(handle);
    let exchange = task.await?;
    info!(events = exchange.events().len(), "input closed, exchange stopped");
    Ok(())
}
